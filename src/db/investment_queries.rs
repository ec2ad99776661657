use bigdecimal::BigDecimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Investment, UpdateInvestment};

const COLUMNS: &str = "id, investor_id, amount, date, kind, notes, created_at";

pub async fn insert(
    conn: &mut PgConnection,
    investment: Investment,
) -> Result<Investment, sqlx::Error> {
    sqlx::query_as::<_, Investment>(&format!(
        "INSERT INTO investments (id, investor_id, amount, date, kind, notes, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {}",
        COLUMNS
    ))
    .bind(investment.id)
    .bind(investment.investor_id)
    .bind(investment.amount)
    .bind(investment.date)
    .bind(investment.kind)
    .bind(investment.notes)
    .bind(investment.created_at)
    .fetch_one(conn)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Investment>, sqlx::Error> {
    sqlx::query_as::<_, Investment>(&format!(
        "SELECT {} FROM investments WHERE id = $1",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_for_investor(
    pool: &PgPool,
    investor_id: Uuid,
) -> Result<Vec<Investment>, sqlx::Error> {
    sqlx::query_as::<_, Investment>(&format!(
        "SELECT {} FROM investments WHERE investor_id = $1 ORDER BY date DESC",
        COLUMNS
    ))
    .bind(investor_id)
    .fetch_all(pool)
    .await
}

pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    input: UpdateInvestment,
) -> Result<Option<Investment>, sqlx::Error> {
    sqlx::query_as::<_, Investment>(&format!(
        "UPDATE investments
         SET amount = $2, date = $3, kind = $4, notes = $5
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .bind(input.amount)
    .bind(input.date)
    .bind(input.kind)
    .bind(input.notes)
    .fetch_optional(conn)
    .await
}

/// Delete one row, reporting which investor it belonged to so the rollup can
/// be scheduled.
pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("DELETE FROM investments WHERE id = $1 RETURNING investor_id")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Bulk delete, returning the affected investor ids (with repeats; the
/// orchestrator deduplicates so each investor is recomputed once).
pub async fn bulk_delete(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "DELETE FROM investments WHERE id = ANY($1) RETURNING investor_id",
    )
    .bind(ids)
    .fetch_all(conn)
    .await
}

pub async fn sum_for_investor(
    conn: &mut PgConnection,
    investor_id: Uuid,
) -> Result<BigDecimal, sqlx::Error> {
    sqlx::query_scalar::<_, BigDecimal>(
        "SELECT COALESCE(SUM(amount), 0) FROM investments WHERE investor_id = $1",
    )
    .bind(investor_id)
    .fetch_one(conn)
    .await
}
