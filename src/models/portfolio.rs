use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "risk_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

// A named grouping of positions, optionally owned by an investor and
// optionally feeding into exactly one fund.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Portfolio {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub investor_id: Option<Uuid>,
    pub fund_id: Option<Uuid>,
    pub currency: String,
    pub risk_level: RiskLevel,
    pub target_return: Option<BigDecimal>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePortfolio {
    pub name: String,
    pub description: Option<String>,
    pub investor_id: Option<Uuid>,
    pub fund_id: Option<Uuid>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_risk_level")]
    pub risk_level: RiskLevel,
    pub target_return: Option<BigDecimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePortfolio {
    pub name: String,
    pub description: Option<String>,
    pub investor_id: Option<Uuid>,
    pub fund_id: Option<Uuid>,
    #[serde(default = "default_currency")]
    pub currency: String,
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

impl Portfolio {
    pub(crate) fn new(input: CreatePortfolio) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            investor_id: input.investor_id,
            fund_id: input.fund_id,
            currency: input.currency,
            risk_level: input.risk_level,
            target_return: input.target_return,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
