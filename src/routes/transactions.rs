use axum::extract::{Path, State};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Transaction, UpdateTransaction};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_transaction))
        .route("/:id", put(update_transaction))
        .route("/:id", delete(delete_transaction))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    info!("GET /transactions/{} - Fetching transaction", id);
    let transaction = services::transaction_service::fetch_one(&state.pool, id).await?;
    Ok(Json(transaction))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTransaction>,
) -> Result<Json<Transaction>, AppError> {
    info!("PUT /transactions/{} - Correcting transaction", id);
    let transaction = services::transaction_service::update(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update transaction {}: {}", id, e);
            e
        })?;
    Ok(Json(transaction))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /transactions/{} - Deleting transaction", id);
    services::transaction_service::delete(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete transaction {}: {}", id, e);
            e
        })?;
    Ok(Json(()))
}
