use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::services::ingest_service::{self, IngestReport};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ingest", post(trigger_ingest))
}

/// Manual ingestion trigger; shares the run lock with the scheduled job, so
/// a concurrent run answers 409.
pub async fn trigger_ingest(
    State(state): State<AppState>,
) -> Result<Json<IngestReport>, AppError> {
    info!("POST /market/ingest - Manual market ingestion");
    let report = ingest_service::ingest(
        &state.pool,
        state.market_provider.as_ref(),
        &state.ingest_lock,
    )
    .await
    .map_err(|e| {
        error!("Manual ingestion failed: {}", e);
        e
    })?;
    Ok(Json(report))
}
