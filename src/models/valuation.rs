use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::InvestedSource;

// Read-time view models. Every figure here is computed on demand from
// positions, latest prices and fund state; none of it is persisted.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionValuation {
    pub position_id: Uuid,
    pub instrument_id: Uuid,
    pub instrument_code: String,
    pub quantity: BigDecimal,
    pub average_cost: BigDecimal,
    pub total_cost: BigDecimal,
    pub current_price: BigDecimal,
    pub current_value: BigDecimal,
    pub profit_loss: BigDecimal,
    pub profit_loss_pct: BigDecimal,
    pub is_open: bool,
    pub open_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub portfolio_id: Uuid,
    pub total_current_value: BigDecimal,
    pub total_cost: BigDecimal,
    pub profit_loss: BigDecimal,
    pub profit_loss_pct: BigDecimal,
    pub positions: Vec<PositionValuation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundValuation {
    pub fund_id: Uuid,
    pub initial_value: BigDecimal,
    pub current_value: BigDecimal,
    pub total_shares: BigDecimal,
    pub share_value: BigDecimal,
    pub total_return_amount: BigDecimal,
    pub total_return_pct: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundShareValuation {
    pub share_id: Uuid,
    pub fund_id: Uuid,
    pub investor_id: Uuid,
    pub shares_count: BigDecimal,
    pub initial_investment: BigDecimal,
    pub current_value: BigDecimal,
    pub profit_loss: BigDecimal,
    pub profit_loss_pct: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorSummary {
    pub investor_id: Uuid,
    pub name: String,
    pub invested_source: InvestedSource,
    pub total_invested: BigDecimal,
    pub current_portfolio_value: BigDecimal,
    pub profit_loss: BigDecimal,
    pub profit_loss_pct: BigDecimal,
}
