use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// One row of the append-only price history. The BIGSERIAL id is the
// tie-breaker when two rows share an ingestion timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceSnapshot {
    pub id: i64,
    pub instrument_id: Uuid,
    pub price: BigDecimal,
    pub change_pct: BigDecimal,
    pub volume: Option<BigDecimal>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub exchange_time: String,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPriceSnapshot {
    pub instrument_id: Uuid,
    pub price: BigDecimal,
    pub change_pct: BigDecimal,
    pub volume: Option<BigDecimal>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub exchange_time: String,
}

impl PriceSnapshot {
    /// Whether an incoming snapshot repeats this row: same exchange time
    /// label, same price, same change. Such rows are not re-inserted.
    pub fn is_repeat_of(&self, incoming: &NewPriceSnapshot) -> bool {
        self.exchange_time == incoming.exchange_time
            && self.price == incoming.price
            && self.change_pct == incoming.change_pct
    }
}
