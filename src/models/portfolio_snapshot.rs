use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Daily valuation history written by the snapshot job, one row per
// portfolio per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PortfolioSnapshot {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub date: NaiveDate,
    pub total_value: BigDecimal,
    pub total_cost: BigDecimal,
    pub profit_loss: BigDecimal,
    pub profit_loss_pct: BigDecimal,
}
