use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::AppError;
use crate::services::retention_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/retention/run", post(run_retention))
}

#[derive(Debug, Deserialize)]
pub struct RetentionRequest {
    #[serde(default = "default_keep_days")]
    pub keep_days: i64,
}

fn default_keep_days() -> i64 {
    30
}

#[derive(Debug, Serialize)]
pub struct RetentionResponse {
    pub deleted: u64,
    pub keep_days: i64,
}

pub async fn run_retention(
    State(state): State<AppState>,
    Json(data): Json<RetentionRequest>,
) -> Result<Json<RetentionResponse>, AppError> {
    info!("POST /admin/retention/run - Pruning price history (keep {} days)", data.keep_days);
    let deleted = retention_service::prune_price_history(&state.pool, data.keep_days)
        .await
        .map_err(|e| {
            error!("Retention run failed: {}", e);
            e
        })?;
    Ok(Json(RetentionResponse {
        deleted,
        keep_days: data.keep_days,
    }))
}
