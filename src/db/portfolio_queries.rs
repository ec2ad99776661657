use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Portfolio, UpdatePortfolio};

const COLUMNS: &str = "id, name, description, investor_id, fund_id, currency, risk_level, \
                       target_return, is_active, created_at, updated_at";

pub async fn insert(pool: &PgPool, portfolio: Portfolio) -> Result<Portfolio, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "INSERT INTO portfolios
             (id, name, description, investor_id, fund_id, currency, risk_level,
              target_return, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING {}",
        COLUMNS
    ))
    .bind(portfolio.id)
    .bind(portfolio.name)
    .bind(portfolio.description)
    .bind(portfolio.investor_id)
    .bind(portfolio.fund_id)
    .bind(portfolio.currency)
    .bind(portfolio.risk_level)
    .bind(portfolio.target_return)
    .bind(portfolio.is_active)
    .bind(portfolio.created_at)
    .bind(portfolio.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {} FROM portfolios ORDER BY created_at DESC",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!("SELECT {} FROM portfolios WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_one_conn(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!("SELECT {} FROM portfolios WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Lock and fetch a portfolio row. Replays lock the portfolio before
/// touching its position slots, so concurrent writers to the same pair
/// serialize even when the position row does not exist yet.
pub async fn fetch_one_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {} FROM portfolios WHERE id = $1 FOR UPDATE",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    input: UpdatePortfolio,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "UPDATE portfolios
         SET name = $2, description = $3, investor_id = $4, fund_id = $5, currency = $6,
             risk_level = $7, target_return = $8, is_active = $9, updated_at = now()
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.investor_id)
    .bind(input.fund_id)
    .bind(input.currency)
    .bind(input.risk_level)
    .bind(input.target_return)
    .bind(input.is_active)
    .fetch_optional(conn)
    .await
}

pub async fn delete_conn(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Ids of all portfolios feeding into a fund, used by the fund aggregator.
pub async fn fetch_ids_for_fund(
    conn: &mut PgConnection,
    fund_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM portfolios WHERE fund_id = $1")
        .bind(fund_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_active_ids(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM portfolios WHERE is_active")
        .fetch_all(pool)
        .await
}
