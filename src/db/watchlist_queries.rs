use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateWatchListItem, UpdateWatchList, WatchList, WatchListItem};

pub async fn insert(pool: &PgPool, name: &str, description: Option<&str>) -> Result<WatchList, sqlx::Error> {
    sqlx::query_as::<_, WatchList>(
        "INSERT INTO watchlists (id, name, description)
         VALUES ($1, $2, $3)
         RETURNING id, name, description, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<WatchList>, sqlx::Error> {
    sqlx::query_as::<_, WatchList>(
        "SELECT id, name, description, created_at FROM watchlists ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<WatchList>, sqlx::Error> {
    sqlx::query_as::<_, WatchList>(
        "SELECT id, name, description, created_at FROM watchlists WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdateWatchList,
) -> Result<Option<WatchList>, sqlx::Error> {
    sqlx::query_as::<_, WatchList>(
        "UPDATE watchlists SET name = $2, description = $3
         WHERE id = $1
         RETURNING id, name, description, created_at",
    )
    .bind(id)
    .bind(input.name)
    .bind(input.description)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM watchlists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_item(
    pool: &PgPool,
    watchlist_id: Uuid,
    input: CreateWatchListItem,
) -> Result<WatchListItem, sqlx::Error> {
    sqlx::query_as::<_, WatchListItem>(
        "INSERT INTO watchlist_items (id, watchlist_id, instrument_id, target_price, notes)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, watchlist_id, instrument_id, target_price, notes, added_at",
    )
    .bind(Uuid::new_v4())
    .bind(watchlist_id)
    .bind(input.instrument_id)
    .bind(input.target_price)
    .bind(input.notes)
    .fetch_one(pool)
    .await
}

pub async fn fetch_items(
    pool: &PgPool,
    watchlist_id: Uuid,
) -> Result<Vec<WatchListItem>, sqlx::Error> {
    sqlx::query_as::<_, WatchListItem>(
        "SELECT id, watchlist_id, instrument_id, target_price, notes, added_at
         FROM watchlist_items
         WHERE watchlist_id = $1
         ORDER BY added_at",
    )
    .bind(watchlist_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_item(pool: &PgPool, item_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM watchlist_items WHERE id = $1")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
