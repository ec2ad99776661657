use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::external::market_provider::MarketProvider;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub market_provider: Arc<dyn MarketProvider>,
    /// Run-level lock shared by the scheduler and the manual ingest
    /// endpoint; one ingestion at a time, holders skip instead of queueing.
    pub ingest_lock: Arc<Mutex<()>>,
}
