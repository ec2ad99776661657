use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{BulkDeleteInvestments, CreateInvestment, Investment, UpdateInvestment};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_investment))
        .route("/:id", get(get_investment))
        .route("/:id", put(update_investment))
        .route("/:id", delete(delete_investment))
        .route("/bulk-delete", post(bulk_delete_investments))
}

pub async fn create_investment(
    State(state): State<AppState>,
    Json(data): Json<CreateInvestment>,
) -> Result<Json<Investment>, AppError> {
    info!("POST /investments - Recording cash contribution");
    let investment = services::investment_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to record investment: {}", e);
            e
        })?;
    Ok(Json(investment))
}

pub async fn get_investment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Investment>, AppError> {
    info!("GET /investments/{} - Fetching investment", id);
    let investment = services::investment_service::fetch_one(&state.pool, id).await?;
    Ok(Json(investment))
}

pub async fn update_investment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateInvestment>,
) -> Result<Json<Investment>, AppError> {
    info!("PUT /investments/{} - Correcting investment", id);
    let investment = services::investment_service::update(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update investment {}: {}", id, e);
            e
        })?;
    Ok(Json(investment))
}

pub async fn delete_investment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /investments/{} - Deleting investment", id);
    services::investment_service::delete(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete investment {}: {}", id, e);
            e
        })?;
    Ok(Json(()))
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

pub async fn bulk_delete_investments(
    State(state): State<AppState>,
    Json(data): Json<BulkDeleteInvestments>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    info!("POST /investments/bulk-delete - Deleting {} investment(s)", data.ids.len());
    let deleted = services::investment_service::bulk_delete(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Bulk investment delete failed: {}", e);
            e
        })?;
    Ok(Json(BulkDeleteResponse { deleted }))
}
