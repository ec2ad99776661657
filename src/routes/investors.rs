use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CreateInvestor, FundShareValuation, InvestedSource, Investment, Investor, InvestorSummary,
    UpdateInvestor,
};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_investor).get(fetch_investors))
        .route("/:id", get(get_investor))
        .route("/:id", put(update_investor))
        .route("/:id", delete(delete_investor))
        .route("/:id/summary", get(get_summary))
        .route("/:id/shares", get(fetch_shares))
        .route("/:id/investments", get(fetch_investments))
        .route("/:id/recompute", post(recompute_total))
}

pub async fn create_investor(
    State(state): State<AppState>,
    Json(data): Json<CreateInvestor>,
) -> Result<Json<Investor>, AppError> {
    info!("POST /investors - Creating investor");
    let investor = services::investor_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create investor: {}", e);
            e
        })?;
    Ok(Json(investor))
}

pub async fn fetch_investors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Investor>>, AppError> {
    info!("GET /investors - Fetching all investors");
    let investors = services::investor_service::fetch_all(&state.pool).await?;
    Ok(Json(investors))
}

pub async fn get_investor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Investor>, AppError> {
    info!("GET /investors/{} - Fetching investor", id);
    let investor = services::investor_service::fetch_one(&state.pool, id).await?;
    Ok(Json(investor))
}

pub async fn update_investor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateInvestor>,
) -> Result<Json<Investor>, AppError> {
    info!("PUT /investors/{} - Updating investor", id);
    let investor = services::investor_service::update(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update investor {}: {}", id, e);
            e
        })?;
    Ok(Json(investor))
}

pub async fn delete_investor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /investors/{} - Deleting investor", id);
    services::investor_service::delete(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete investor {}: {}", id, e);
            e
        })?;
    Ok(Json(()))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvestorSummary>, AppError> {
    info!("GET /investors/{}/summary - Computing summary", id);
    let summary = services::investor_service::summary(&state.pool, id).await?;
    Ok(Json(summary))
}

pub async fn fetch_shares(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FundShareValuation>>, AppError> {
    info!("GET /investors/{}/shares - Fetching fund share holdings", id);
    services::investor_service::fetch_one(&state.pool, id).await?;
    let shares = services::investor_service::list_share_valuations(&state.pool, id).await?;
    Ok(Json(shares))
}

pub async fn fetch_investments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Investment>>, AppError> {
    info!("GET /investors/{}/investments - Fetching cash contributions", id);
    services::investor_service::fetch_one(&state.pool, id).await?;
    let investments = services::investment_service::list_for_investor(&state.pool, id).await?;
    Ok(Json(investments))
}

#[derive(Debug, Deserialize)]
pub struct RecomputeParams {
    source: Option<InvestedSource>,
}

/// Recompute the cached contribution total, optionally forcing one of the
/// two sources instead of the investor's configured one.
pub async fn recompute_total(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<RecomputeParams>,
) -> Result<Json<Investor>, AppError> {
    info!("POST /investors/{}/recompute - Recomputing total invested", id);
    let investor = services::investor_service::recompute_total(&state.pool, id, params.source)
        .await
        .map_err(|e| {
            error!("Failed to recompute totals for investor {}: {}", id, e);
            e
        })?;
    Ok(Json(investor))
}
