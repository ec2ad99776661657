use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CreateWatchList, CreateWatchListItem, UpdateWatchList, WatchList, WatchListItem,
};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_watchlist).get(fetch_watchlists))
        .route("/:id", get(get_watchlist))
        .route("/:id", put(update_watchlist))
        .route("/:id", delete(delete_watchlist))
        .route("/:id/items", post(add_item).get(fetch_items))
        .route("/items/:item_id", delete(remove_item))
}

pub async fn create_watchlist(
    State(state): State<AppState>,
    Json(data): Json<CreateWatchList>,
) -> Result<Json<WatchList>, AppError> {
    info!("POST /watchlists - Creating watchlist");
    let watchlist = services::watchlist_service::create(&state.pool, data)
        .await
        .map_err(|e| {
            error!("Failed to create watchlist: {}", e);
            e
        })?;
    Ok(Json(watchlist))
}

pub async fn fetch_watchlists(
    State(state): State<AppState>,
) -> Result<Json<Vec<WatchList>>, AppError> {
    info!("GET /watchlists - Fetching all watchlists");
    let watchlists = services::watchlist_service::fetch_all(&state.pool).await?;
    Ok(Json(watchlists))
}

pub async fn get_watchlist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WatchList>, AppError> {
    info!("GET /watchlists/{} - Fetching watchlist", id);
    let watchlist = services::watchlist_service::fetch_one(&state.pool, id).await?;
    Ok(Json(watchlist))
}

pub async fn update_watchlist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateWatchList>,
) -> Result<Json<WatchList>, AppError> {
    info!("PUT /watchlists/{} - Updating watchlist", id);
    let watchlist = services::watchlist_service::update(&state.pool, id, data).await?;
    Ok(Json(watchlist))
}

pub async fn delete_watchlist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /watchlists/{} - Deleting watchlist", id);
    services::watchlist_service::delete(&state.pool, id).await?;
    Ok(Json(()))
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateWatchListItem>,
) -> Result<Json<WatchListItem>, AppError> {
    info!("POST /watchlists/{}/items - Adding instrument", id);
    let item = services::watchlist_service::add_item(&state.pool, id, data)
        .await
        .map_err(|e| {
            error!("Failed to add item to watchlist {}: {}", id, e);
            e
        })?;
    Ok(Json(item))
}

pub async fn fetch_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<WatchListItem>>, AppError> {
    info!("GET /watchlists/{}/items - Fetching items", id);
    let items = services::watchlist_service::list_items(&state.pool, id).await?;
    Ok(Json(items))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /watchlists/items/{} - Removing item", item_id);
    services::watchlist_service::remove_item(&state.pool, item_id).await?;
    Ok(Json(()))
}
