use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
    Dividend,
    Split,
    Merger,
    Rights,
}

// A recorded trade or corporate action against a portfolio. For split and
// merger rows the price field carries the ratio, not a price.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub instrument_id: Uuid,
    pub investor_id: Option<Uuid>,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    pub commission: BigDecimal,
    pub tax: BigDecimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransaction {
    pub instrument_id: Uuid,
    pub investor_id: Option<Uuid>,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    #[serde(default = "zero")]
    pub commission: BigDecimal,
    #[serde(default = "zero")]
    pub tax: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTransaction {
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub price: BigDecimal,
    pub quantity: BigDecimal,
    #[serde(default = "zero")]
    pub commission: BigDecimal,
    #[serde(default = "zero")]
    pub tax: BigDecimal,
    pub notes: Option<String>,
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

impl Transaction {
    /// Gross settlement amount: buys add commission and tax, sells deduct
    /// them from the proceeds.
    pub fn total_amount(&self) -> BigDecimal {
        let amount = &self.price * &self.quantity;
        match self.kind {
            TransactionKind::Buy => amount + &self.commission + &self.tax,
            _ => amount - &self.commission - &self.tax,
        }
    }
}
