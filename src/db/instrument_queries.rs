use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Instrument;

const COLUMNS: &str = "id, code, name, icon_url, created_at";

pub async fn insert(pool: &PgPool, instrument: Instrument) -> Result<Instrument, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(
        "INSERT INTO instruments (id, code, name, icon_url, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, code, name, icon_url, created_at",
    )
    .bind(instrument.id)
    .bind(instrument.code)
    .bind(instrument.name)
    .bind(instrument.icon_url)
    .bind(instrument.created_at)
    .fetch_one(pool)
    .await
}

/// Insert-or-refresh by exchange code. Ingestion calls this for every quote
/// so display names and icons track the feed.
pub async fn upsert_by_code(
    conn: &mut PgConnection,
    code: &str,
    name: &str,
    icon_url: Option<&str>,
) -> Result<Instrument, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(
        "INSERT INTO instruments (id, code, name, icon_url)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (code)
         DO UPDATE SET name = EXCLUDED.name, icon_url = EXCLUDED.icon_url
         RETURNING id, code, name, icon_url, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(code)
    .bind(name)
    .bind(icon_url)
    .fetch_one(conn)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Instrument>, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(&format!(
        "SELECT {} FROM instruments ORDER BY code",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Instrument>, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(&format!(
        "SELECT {} FROM instruments WHERE id = $1",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_by_code(pool: &PgPool, code: &str) -> Result<Option<Instrument>, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(&format!(
        "SELECT {} FROM instruments WHERE code = $1",
        COLUMNS
    ))
    .bind(code)
    .fetch_optional(pool)
    .await
}

/// Code lookup for a set of instrument ids, used when valuations label
/// positions.
pub async fn fetch_code_map(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> Result<std::collections::HashMap<Uuid, String>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(std::collections::HashMap::new());
    }

    let rows = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT id, code FROM instruments WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().collect())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM instruments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
