use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchList {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// One instrument on a watchlist; unique per (watchlist, instrument).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WatchListItem {
    pub id: Uuid,
    pub watchlist_id: Uuid,
    pub instrument_id: Uuid,
    pub target_price: Option<BigDecimal>,
    pub notes: Option<String>,
    pub added_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWatchList {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateWatchList {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWatchListItem {
    pub instrument_id: Uuid,
    pub target_price: Option<BigDecimal>,
    pub notes: Option<String>,
}
