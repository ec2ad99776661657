use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// A tradable security identified by its exchange code (e.g. "THYAO").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Instrument {
    pub id: uuid::Uuid,
    pub code: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateInstrument {
    pub code: String,
    pub name: String,
    pub icon_url: Option<String>,
}

impl Instrument {
    pub(crate) fn new(code: String, name: String, icon_url: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            code,
            name,
            icon_url,
            created_at: chrono::Utc::now(),
        }
    }
}
