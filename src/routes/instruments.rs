use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CreateInstrument, Instrument, PriceSnapshot};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_instrument).get(fetch_instruments))
        .route("/:id", get(get_instrument))
        .route("/:id", delete(delete_instrument))
        .route("/:id/price", get(get_latest_price))
        .route("/:id/history", get(get_price_history))
}

pub async fn create_instrument(
    State(state): State<AppState>,
    Json(data): Json<CreateInstrument>,
) -> Result<Json<Instrument>, AppError> {
    info!("POST /instruments - Creating instrument {}", data.code);
    let instrument = services::instrument_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create instrument: {}", e);
            e
        })?;
    Ok(Json(instrument))
}

pub async fn fetch_instruments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Instrument>>, AppError> {
    info!("GET /instruments - Fetching all instruments");
    let instruments = services::instrument_service::fetch_all(&state.pool).await?;
    Ok(Json(instruments))
}

pub async fn get_instrument(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Instrument>, AppError> {
    info!("GET /instruments/{} - Fetching instrument", id);
    let instrument = services::instrument_service::fetch_one(&state.pool, id).await?;
    Ok(Json(instrument))
}

pub async fn get_latest_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PriceSnapshot>, AppError> {
    info!("GET /instruments/{}/price - Fetching latest price", id);
    let price = services::instrument_service::latest_price(&state.pool, id).await?;
    Ok(Json(price))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    limit: Option<i64>,
}

pub async fn get_price_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<PriceSnapshot>>, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    info!("GET /instruments/{}/history - Fetching {} rows", id, limit);
    let history = services::instrument_service::price_history(&state.pool, id, limit).await?;
    Ok(Json(history))
}

pub async fn delete_instrument(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /instruments/{} - Deleting instrument", id);
    services::instrument_service::delete(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete instrument {}: {}", id, e);
            e
        })?;
    Ok(Json(()))
}
