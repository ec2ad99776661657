use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::RiskLevel;

// A pooled vehicle whose current value is either aggregated from linked
// portfolios or moved directly by share issuance and redemption.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Fund {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub creation_date: NaiveDate,
    pub currency: String,
    pub management_fee: BigDecimal,
    pub risk_level: RiskLevel,
    pub target_return: Option<BigDecimal>,
    pub is_active: bool,
    pub initial_value: BigDecimal,
    pub current_value: BigDecimal,
    pub total_shares: BigDecimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFund {
    pub name: String,
    pub description: Option<String>,
    pub creation_date: NaiveDate,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "zero")]
    pub management_fee: BigDecimal,
    #[serde(default = "default_risk_level")]
    pub risk_level: RiskLevel,
    pub target_return: Option<BigDecimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFund {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "zero")]
    pub management_fee: BigDecimal,
    #[serde(default = "default_risk_level")]
    pub risk_level: RiskLevel,
    pub target_return: Option<BigDecimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_currency() -> String {
    "TRY".to_string()
}

fn default_risk_level() -> RiskLevel {
    RiskLevel::Medium
}

fn default_active() -> bool {
    true
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

impl Fund {
    pub(crate) fn new(input: CreateFund) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            creation_date: input.creation_date,
            currency: input.currency,
            management_fee: input.management_fee,
            risk_level: input.risk_level,
            target_return: input.target_return,
            is_active: true,
            initial_value: BigDecimal::from(0),
            current_value: BigDecimal::from(0),
            total_shares: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        }
    }

    /// Unit share value: current value over shares outstanding, 0 while the
    /// fund has no shares.
    pub fn share_value(&self) -> BigDecimal {
        if self.total_shares == BigDecimal::from(0) {
            return BigDecimal::from(0);
        }
        &self.current_value / &self.total_shares
    }

    /// Total return since inception as a percentage of initial value.
    pub fn total_return_pct(&self) -> BigDecimal {
        if self.initial_value == BigDecimal::from(0) {
            return BigDecimal::from(0);
        }
        (&self.current_value - &self.initial_value) / &self.initial_value * BigDecimal::from(100)
    }

    pub fn total_return_amount(&self) -> BigDecimal {
        &self.current_value - &self.initial_value
    }
}
