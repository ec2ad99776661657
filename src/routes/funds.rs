use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CreateFund, CreateFundShare, Fund, FundShare, FundShareValuation, FundValuation, UpdateFund,
    UpdateFundShare,
};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_fund).get(fetch_funds))
        .route("/:id", get(get_fund))
        .route("/:id", put(update_fund))
        .route("/:id", delete(delete_fund))
        .route("/:id/valuation", get(get_valuation))
        .route("/:id/refresh", post(refresh_fund))
        .route("/:id/shares", post(create_share).get(fetch_shares))
        .route("/:id/shares/:share_id", put(update_share))
        .route("/:id/shares/:share_id", delete(delete_share))
}

pub async fn create_fund(
    State(state): State<AppState>,
    Json(data): Json<CreateFund>,
) -> Result<Json<Fund>, AppError> {
    info!("POST /funds - Creating new fund");
    let fund = services::fund_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create fund: {}", e);
            e
        })?;
    Ok(Json(fund))
}

pub async fn fetch_funds(State(state): State<AppState>) -> Result<Json<Vec<Fund>>, AppError> {
    info!("GET /funds - Fetching all funds");
    let funds = services::fund_service::fetch_all(&state.pool).await?;
    Ok(Json(funds))
}

pub async fn get_fund(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Fund>, AppError> {
    info!("GET /funds/{} - Fetching fund", id);
    let fund = services::fund_service::fetch_one(&state.pool, id).await?;
    Ok(Json(fund))
}

pub async fn update_fund(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateFund>,
) -> Result<Json<Fund>, AppError> {
    info!("PUT /funds/{} - Updating fund", id);
    let fund = services::fund_service::update(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update fund {}: {}", id, e);
            e
        })?;
    Ok(Json(fund))
}

pub async fn delete_fund(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /funds/{} - Deleting fund", id);
    services::fund_service::delete(&state.pool, id).await?;
    Ok(Json(()))
}

pub async fn get_valuation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FundValuation>, AppError> {
    info!("GET /funds/{}/valuation - Computing valuation", id);
    let valuation = services::fund_service::valuation(&state.pool, id).await?;
    Ok(Json(valuation))
}

pub async fn refresh_fund(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Fund>, AppError> {
    info!("POST /funds/{}/refresh - Re-aggregating from portfolios", id);
    let fund = services::fund_service::refresh(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to refresh fund {}: {}", id, e);
            e
        })?;
    Ok(Json(fund))
}

pub async fn create_share(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateFundShare>,
) -> Result<Json<FundShare>, AppError> {
    info!("POST /funds/{}/shares - Issuing shares", id);
    let share = services::fund_service::create_share(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to issue shares for fund {}: {}", id, e);
            e
        })?;
    Ok(Json(share))
}

pub async fn fetch_shares(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FundShareValuation>>, AppError> {
    info!("GET /funds/{}/shares - Fetching share holdings", id);
    let shares = services::fund_service::list_shares(&state.pool, id).await?;
    Ok(Json(shares))
}

pub async fn update_share(
    State(state): State<AppState>,
    Path((id, share_id)): Path<(Uuid, Uuid)>,
    Json(data): Json<UpdateFundShare>,
) -> Result<Json<FundShare>, AppError> {
    info!("PUT /funds/{}/shares/{} - Correcting share investment", id, share_id);
    let share = services::fund_service::update_share(&state.pool, id, share_id, data)
        .await
        .map_err(|e| {
            error!("Failed to update share {} of fund {}: {}", share_id, id, e);
            e
        })?;
    Ok(Json(share))
}

pub async fn delete_share(
    State(state): State<AppState>,
    Path((id, share_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /funds/{}/shares/{} - Redeeming shares", id, share_id);
    services::fund_service::delete_share(&state.pool, id, share_id)
        .await
        .map_err(|e| {
            error!("Failed to redeem share {} of fund {}: {}", share_id, id, e);
            e
        })?;
    Ok(Json(()))
}
