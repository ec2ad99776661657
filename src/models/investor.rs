use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::RiskLevel;

// Which ledger the cached total_invested projection is recomputed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invested_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvestedSource {
    Transactions,
    Investments,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Investor {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub risk_profile: RiskLevel,
    pub investment_goal: Option<String>,
    pub notes: Option<String>,
    // Cached projection, rewritten only by the investor rollup.
    pub total_invested: BigDecimal,
    pub invested_source: InvestedSource,
    pub start_date: Option<NaiveDate>,
    pub monthly_contribution: BigDecimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInvestor {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    #[serde(default = "default_risk")]
    pub risk_profile: RiskLevel,
    pub investment_goal: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_source")]
    pub invested_source: InvestedSource,
    pub start_date: Option<NaiveDate>,
    #[serde(default = "zero")]
    pub monthly_contribution: BigDecimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateInvestor {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    #[serde(default = "default_risk")]
    pub risk_profile: RiskLevel,
    pub investment_goal: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_source")]
    pub invested_source: InvestedSource,
    pub start_date: Option<NaiveDate>,
    #[serde(default = "zero")]
    pub monthly_contribution: BigDecimal,
}

fn default_risk() -> RiskLevel {
    RiskLevel::Medium
}

fn default_source() -> InvestedSource {
    InvestedSource::Investments
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

impl Investor {
    pub(crate) fn new(input: CreateInvestor) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            tax_id: input.tax_id,
            risk_profile: input.risk_profile,
            investment_goal: input.investment_goal,
            notes: input.notes,
            total_invested: BigDecimal::from(0),
            invested_source: input.invested_source,
            start_date: input.start_date,
            monthly_contribution: input.monthly_contribution,
            created_at: now,
            updated_at: now,
        }
    }
}
