use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Position;

const COLUMNS: &str = "id, portfolio_id, instrument_id, quantity, average_cost, open_date, is_open";

/// Lock and fetch the position slot for a (portfolio, instrument) pair.
/// Propagation takes this lock before replaying so concurrent writers to the
/// same pair serialize.
pub async fn fetch_by_pair_for_update(
    conn: &mut PgConnection,
    portfolio_id: Uuid,
    instrument_id: Uuid,
) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "SELECT {} FROM positions
         WHERE portfolio_id = $1 AND instrument_id = $2
         FOR UPDATE",
        COLUMNS
    ))
    .bind(portfolio_id)
    .bind(instrument_id)
    .fetch_optional(conn)
    .await
}

pub async fn upsert(
    conn: &mut PgConnection,
    position: &Position,
) -> Result<Position, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "INSERT INTO positions
             (id, portfolio_id, instrument_id, quantity, average_cost, open_date, is_open)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (portfolio_id, instrument_id)
         DO UPDATE SET quantity = EXCLUDED.quantity,
                       average_cost = EXCLUDED.average_cost,
                       open_date = EXCLUDED.open_date,
                       is_open = EXCLUDED.is_open
         RETURNING {}",
        COLUMNS
    ))
    .bind(position.id)
    .bind(position.portfolio_id)
    .bind(position.instrument_id)
    .bind(&position.quantity)
    .bind(&position.average_cost)
    .bind(position.open_date)
    .bind(position.is_open)
    .fetch_one(conn)
    .await
}

pub async fn delete_by_pair(
    conn: &mut PgConnection,
    portfolio_id: Uuid,
    instrument_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM positions WHERE portfolio_id = $1 AND instrument_id = $2")
        .bind(portfolio_id)
        .bind(instrument_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn fetch_all(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "SELECT {} FROM positions WHERE portfolio_id = $1 ORDER BY open_date",
        COLUMNS
    ))
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_all_conn(
    conn: &mut PgConnection,
    portfolio_id: Uuid,
) -> Result<Vec<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "SELECT {} FROM positions WHERE portfolio_id = $1 ORDER BY open_date",
        COLUMNS
    ))
    .bind(portfolio_id)
    .fetch_all(conn)
    .await
}
