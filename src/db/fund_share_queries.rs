use bigdecimal::BigDecimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::FundShare;

const COLUMNS: &str =
    "id, fund_id, investor_id, shares_count, initial_investment, entry_date, notes, last_updated";

pub async fn insert(
    conn: &mut PgConnection,
    share: &FundShare,
) -> Result<FundShare, sqlx::Error> {
    sqlx::query_as::<_, FundShare>(&format!(
        "INSERT INTO fund_shares
             (id, fund_id, investor_id, shares_count, initial_investment, entry_date, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {}",
        COLUMNS
    ))
    .bind(share.id)
    .bind(share.fund_id)
    .bind(share.investor_id)
    .bind(&share.shares_count)
    .bind(&share.initial_investment)
    .bind(share.entry_date)
    .bind(&share.notes)
    .fetch_one(conn)
    .await
}

pub async fn fetch_one_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<FundShare>, sqlx::Error> {
    sqlx::query_as::<_, FundShare>(&format!(
        "SELECT {} FROM fund_shares WHERE id = $1 FOR UPDATE",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn fetch_for_fund(pool: &PgPool, fund_id: Uuid) -> Result<Vec<FundShare>, sqlx::Error> {
    sqlx::query_as::<_, FundShare>(&format!(
        "SELECT {} FROM fund_shares WHERE fund_id = $1 ORDER BY entry_date",
        COLUMNS
    ))
    .bind(fund_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_for_investor(
    pool: &PgPool,
    investor_id: Uuid,
) -> Result<Vec<FundShare>, sqlx::Error> {
    sqlx::query_as::<_, FundShare>(&format!(
        "SELECT {} FROM fund_shares WHERE investor_id = $1 ORDER BY entry_date",
        COLUMNS
    ))
    .bind(investor_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_for_investor_conn(
    conn: &mut PgConnection,
    investor_id: Uuid,
) -> Result<Vec<FundShare>, sqlx::Error> {
    sqlx::query_as::<_, FundShare>(&format!(
        "SELECT {} FROM fund_shares WHERE investor_id = $1 ORDER BY entry_date",
        COLUMNS
    ))
    .bind(investor_id)
    .fetch_all(conn)
    .await
}

pub async fn exists_for_fund_investor(
    conn: &mut PgConnection,
    fund_id: Uuid,
    investor_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM fund_shares WHERE fund_id = $1 AND investor_id = $2)",
    )
    .bind(fund_id)
    .bind(investor_id)
    .fetch_one(conn)
    .await
}

/// Rewrite after an investment correction: the server-recomputed shares_count
/// always lands here, never a caller-supplied one.
pub async fn update_investment(
    conn: &mut PgConnection,
    id: Uuid,
    initial_investment: &BigDecimal,
    shares_count: &BigDecimal,
    notes: Option<&str>,
) -> Result<Option<FundShare>, sqlx::Error> {
    sqlx::query_as::<_, FundShare>(&format!(
        "UPDATE fund_shares
         SET initial_investment = $2, shares_count = $3, notes = $4, last_updated = now()
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .bind(initial_investment)
    .bind(shares_count)
    .bind(notes)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM fund_shares WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
