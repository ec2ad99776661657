use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// An investor's claim on a fund. shares_count is always computed server-side
// from the fund's share value at write time; it is never caller-supplied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FundShare {
    pub id: Uuid,
    pub fund_id: Uuid,
    pub investor_id: Uuid,
    pub shares_count: BigDecimal,
    pub initial_investment: BigDecimal,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFundShare {
    pub investor_id: Uuid,
    pub initial_investment: BigDecimal,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
    // Accepted for wire compatibility and ignored: the server recomputes it.
    #[serde(default)]
    pub shares_count: Option<BigDecimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFundShare {
    pub initial_investment: BigDecimal,
    pub notes: Option<String>,
    #[serde(default)]
    pub shares_count: Option<BigDecimal>,
}
