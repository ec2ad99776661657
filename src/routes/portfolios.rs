use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CreatePortfolio, CreateTransaction, Portfolio, PortfolioSnapshot, PortfolioValuation,
    Position, Transaction, UpdatePortfolio,
};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_portfolio).get(fetch_portfolios))
        .route("/:id", get(get_portfolio))
        .route("/:id", put(update_portfolio))
        .route("/:id", delete(delete_portfolio))
        .route("/:id/valuation", get(get_valuation))
        .route("/:id/positions", get(fetch_positions))
        .route("/:id/snapshots", get(fetch_snapshots))
        .route("/:id/transactions", post(create_transaction).get(fetch_transactions))
}

#[axum::debug_handler]
pub async fn create_portfolio(
    State(state): State<AppState>,
    Json(data): Json<CreatePortfolio>,
) -> Result<Json<Portfolio>, AppError> {
    info!("POST /portfolios - Creating new portfolio");
    let portfolio = services::portfolio_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create portfolio: {}", e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn fetch_portfolios(
    State(state): State<AppState>,
) -> Result<Json<Vec<Portfolio>>, AppError> {
    info!("GET /portfolios - Fetching all portfolios");
    let portfolios = services::portfolio_service::fetch_all(&state.pool).await?;
    Ok(Json(portfolios))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Portfolio>, AppError> {
    info!("GET /portfolios/{} - Fetching portfolio", id);
    let portfolio = services::portfolio_service::fetch_one(&state.pool, id).await?;
    Ok(Json(portfolio))
}

pub async fn update_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdatePortfolio>,
) -> Result<Json<Portfolio>, AppError> {
    info!("PUT /portfolios/{} - Updating portfolio", id);
    let portfolio = services::portfolio_service::update(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to update portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(portfolio))
}

pub async fn delete_portfolio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /portfolios/{} - Deleting portfolio", id);
    services::portfolio_service::delete(&state.pool, id)
        .await
        .map_err(|e| {
            error!("Failed to delete portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(()))
}

pub async fn get_valuation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioValuation>, AppError> {
    info!("GET /portfolios/{}/valuation - Computing valuation", id);
    let valuation = services::valuation_service::portfolio_valuation(&state.pool, id).await?;
    Ok(Json(valuation))
}

pub async fn fetch_positions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Position>>, AppError> {
    info!("GET /portfolios/{}/positions - Fetching positions", id);
    services::portfolio_service::fetch_one(&state.pool, id).await?;
    let positions = crate::db::position_queries::fetch_all(&state.pool, id).await?;
    Ok(Json(positions))
}

pub async fn fetch_snapshots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PortfolioSnapshot>>, AppError> {
    info!("GET /portfolios/{}/snapshots - Fetching snapshots", id);
    services::portfolio_service::fetch_one(&state.pool, id).await?;
    let snapshots = services::snapshot_service::history(&state.pool, id).await?;
    Ok(Json(snapshots))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateTransaction>,
) -> Result<Json<Transaction>, AppError> {
    info!("POST /portfolios/{}/transactions - Recording transaction", id);
    let transaction = services::transaction_service::create(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to record transaction for portfolio {}: {}", id, e);
            e
        })?;
    Ok(Json(transaction))
}

pub async fn fetch_transactions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    info!("GET /portfolios/{}/transactions - Fetching transactions", id);
    services::portfolio_service::fetch_one(&state.pool, id).await?;
    let transactions =
        services::transaction_service::list_for_portfolio(&state.pool, id).await?;
    Ok(Json(transactions))
}
