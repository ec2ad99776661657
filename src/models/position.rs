use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Net holding of one instrument within one portfolio. Quantity and average
// cost are derived by replaying the pair's transaction history; rows are
// never written directly by callers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub instrument_id: Uuid,
    pub quantity: BigDecimal,
    pub average_cost: BigDecimal,
    pub open_date: NaiveDate,
    pub is_open: bool,
}

impl Position {
    /// Book cost of the holding: quantity x average cost.
    pub fn total_cost(&self) -> BigDecimal {
        &self.quantity * &self.average_cost
    }
}
