use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreateWatchList, CreateWatchListItem, UpdateWatchList, WatchList, WatchListItem};

pub async fn create(pool: &PgPool, input: CreateWatchList) -> Result<WatchList, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Watchlist name cannot be empty".into()));
    }
    let watchlist =
        db::watchlist_queries::insert(pool, input.name.trim(), input.description.as_deref())
            .await?;
    Ok(watchlist)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<WatchList>, AppError> {
    let watchlists = db::watchlist_queries::fetch_all(pool).await?;
    Ok(watchlists)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<WatchList, AppError> {
    db::watchlist_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Watchlist not found".to_string()))
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateWatchList) -> Result<WatchList, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Watchlist name cannot be empty".into()));
    }
    db::watchlist_queries::update(pool, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Watchlist not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    match db::watchlist_queries::delete(pool, id).await? {
        0 => Err(AppError::NotFound("Watchlist not found".to_string())),
        _ => Ok(()),
    }
}

pub async fn add_item(
    pool: &PgPool,
    watchlist_id: Uuid,
    input: CreateWatchListItem,
) -> Result<WatchListItem, AppError> {
    fetch_one(pool, watchlist_id).await?;

    db::instrument_queries::fetch_one(pool, input.instrument_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Instrument not found".to_string()))?;

    match db::watchlist_queries::insert_item(pool, watchlist_id, input).await {
        Ok(item) => Ok(item),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
            AppError::Conflict("Instrument is already on this watchlist".into()),
        ),
        Err(e) => Err(AppError::Db(e)),
    }
}

pub async fn list_items(pool: &PgPool, watchlist_id: Uuid) -> Result<Vec<WatchListItem>, AppError> {
    fetch_one(pool, watchlist_id).await?;
    let items = db::watchlist_queries::fetch_items(pool, watchlist_id).await?;
    Ok(items)
}

pub async fn remove_item(pool: &PgPool, item_id: Uuid) -> Result<(), AppError> {
    match db::watchlist_queries::delete_item(pool, item_id).await? {
        0 => Err(AppError::NotFound("Watchlist item not found".to_string())),
        _ => Ok(()),
    }
}
