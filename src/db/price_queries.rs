use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{NewPriceSnapshot, PriceSnapshot};

const COLUMNS: &str =
    "id, instrument_id, price, change_pct, volume, min_price, max_price, exchange_time, ingested_at";

pub async fn insert(
    conn: &mut PgConnection,
    snapshot: NewPriceSnapshot,
) -> Result<PriceSnapshot, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(
        "INSERT INTO price_snapshots
             (instrument_id, price, change_pct, volume, min_price, max_price, exchange_time)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, instrument_id, price, change_pct, volume, min_price, max_price,
                   exchange_time, ingested_at",
    )
    .bind(snapshot.instrument_id)
    .bind(snapshot.price)
    .bind(snapshot.change_pct)
    .bind(snapshot.volume)
    .bind(snapshot.min_price)
    .bind(snapshot.max_price)
    .bind(snapshot.exchange_time)
    .fetch_one(conn)
    .await
}

/// Latest snapshot for one instrument. Most recent ingestion wins; insertion
/// order breaks ties.
pub async fn fetch_latest(
    pool: &PgPool,
    instrument_id: Uuid,
) -> Result<Option<PriceSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(&format!(
        "SELECT {} FROM price_snapshots
         WHERE instrument_id = $1
         ORDER BY ingested_at DESC, id DESC
         LIMIT 1",
        COLUMNS
    ))
    .bind(instrument_id)
    .fetch_optional(pool)
    .await
}

/// Most recent row carrying the given exchange time label, used for
/// duplicate suppression during ingestion.
pub async fn fetch_latest_for_exchange_time(
    conn: &mut PgConnection,
    instrument_id: Uuid,
    exchange_time: &str,
) -> Result<Option<PriceSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(&format!(
        "SELECT {} FROM price_snapshots
         WHERE instrument_id = $1 AND exchange_time = $2
         ORDER BY ingested_at DESC, id DESC
         LIMIT 1",
        COLUMNS
    ))
    .bind(instrument_id)
    .bind(exchange_time)
    .fetch_optional(conn)
    .await
}

pub async fn fetch_history(
    pool: &PgPool,
    instrument_id: Uuid,
    limit: i64,
) -> Result<Vec<PriceSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PriceSnapshot>(&format!(
        "SELECT {} FROM price_snapshots
         WHERE instrument_id = $1
         ORDER BY ingested_at DESC, id DESC
         LIMIT $2",
        COLUMNS
    ))
    .bind(instrument_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Latest snapshot per instrument in one round trip (DISTINCT ON keeps the
/// newest row per instrument).
pub async fn fetch_latest_batch(
    conn: &mut PgConnection,
    instrument_ids: &[Uuid],
) -> Result<HashMap<Uuid, PriceSnapshot>, sqlx::Error> {
    if instrument_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, PriceSnapshot>(&format!(
        "SELECT DISTINCT ON (instrument_id) {}
         FROM price_snapshots
         WHERE instrument_id = ANY($1)
         ORDER BY instrument_id, ingested_at DESC, id DESC",
        COLUMNS
    ))
    .bind(instrument_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|p| (p.instrument_id, p)).collect())
}

/// Retention prune: of the rows older than the cutoff, keep the last row of
/// each (instrument, calendar day); each instrument's single most recent row
/// is kept unconditionally. Returns the number of deleted rows.
pub async fn prune_history(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "WITH ranked AS (
             SELECT id,
                    ROW_NUMBER() OVER (
                        PARTITION BY instrument_id, (ingested_at AT TIME ZONE 'UTC')::date
                        ORDER BY ingested_at DESC, id DESC
                    ) AS rn_day,
                    ROW_NUMBER() OVER (
                        PARTITION BY instrument_id
                        ORDER BY ingested_at DESC, id DESC
                    ) AS rn_overall
             FROM price_snapshots
         )
         DELETE FROM price_snapshots p
         USING ranked r
         WHERE p.id = r.id
           AND p.ingested_at < $1
           AND r.rn_day > 1
           AND r.rn_overall > 1",
    )
    .bind(cutoff)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
