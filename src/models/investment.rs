use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "investment_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvestmentKind {
    Initial,
    Additional,
    Monthly,
    Dividend,
    Bonus,
}

// A cash contribution by an investor, independent of any fund or portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Investment {
    pub id: Uuid,
    pub investor_id: Uuid,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    pub kind: InvestmentKind,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInvestment {
    pub investor_id: Uuid,
    pub amount: BigDecimal,
    pub date: NaiveDate,
    #[serde(default = "default_kind")]
    pub kind: InvestmentKind,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateInvestment {
    pub amount: BigDecimal,
    pub date: NaiveDate,
    #[serde(default = "default_kind")]
    pub kind: InvestmentKind,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteInvestments {
    pub ids: Vec<Uuid>,
}

fn default_kind() -> InvestmentKind {
    InvestmentKind::Additional
}
