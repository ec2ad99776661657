use bigdecimal::BigDecimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Fund, UpdateFund};

const COLUMNS: &str = "id, name, description, creation_date, currency, management_fee, \
                       risk_level, target_return, is_active, initial_value, current_value, \
                       total_shares, created_at, updated_at";

pub async fn insert(pool: &PgPool, fund: Fund) -> Result<Fund, sqlx::Error> {
    sqlx::query_as::<_, Fund>(&format!(
        "INSERT INTO funds
             (id, name, description, creation_date, currency, management_fee, risk_level,
              target_return, is_active, initial_value, current_value, total_shares,
              created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING {}",
        COLUMNS
    ))
    .bind(fund.id)
    .bind(fund.name)
    .bind(fund.description)
    .bind(fund.creation_date)
    .bind(fund.currency)
    .bind(fund.management_fee)
    .bind(fund.risk_level)
    .bind(fund.target_return)
    .bind(fund.is_active)
    .bind(fund.initial_value)
    .bind(fund.current_value)
    .bind(fund.total_shares)
    .bind(fund.created_at)
    .bind(fund.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Fund>, sqlx::Error> {
    sqlx::query_as::<_, Fund>(&format!(
        "SELECT {} FROM funds ORDER BY creation_date DESC",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Fund>, sqlx::Error> {
    sqlx::query_as::<_, Fund>(&format!("SELECT {} FROM funds WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lock and fetch a fund row. Every propagation step that rewrites fund
/// value or shares goes through this lock.
pub async fn fetch_one_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Fund>, sqlx::Error> {
    sqlx::query_as::<_, Fund>(&format!(
        "SELECT {} FROM funds WHERE id = $1 FOR UPDATE",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdateFund,
) -> Result<Option<Fund>, sqlx::Error> {
    sqlx::query_as::<_, Fund>(&format!(
        "UPDATE funds
         SET name = $2, description = $3, currency = $4, management_fee = $5, risk_level = $6,
             target_return = $7, is_active = $8, updated_at = now()
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .bind(input.name)
    .bind(input.description)
    .bind(input.currency)
    .bind(input.management_fee)
    .bind(input.risk_level)
    .bind(input.target_return)
    .bind(input.is_active)
    .fetch_optional(pool)
    .await
}

/// Partial write used by the fund aggregator: only current_value moves.
pub async fn set_current_value(
    conn: &mut PgConnection,
    id: Uuid,
    current_value: &BigDecimal,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE funds SET current_value = $2, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(current_value)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Rewrite of the share-ledger fields after issuance or redemption.
pub async fn set_share_ledger_values(
    conn: &mut PgConnection,
    id: Uuid,
    initial_value: &BigDecimal,
    current_value: &BigDecimal,
    total_shares: &BigDecimal,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE funds
         SET initial_value = $2, current_value = $3, total_shares = $4, updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(initial_value)
    .bind(current_value)
    .bind(total_shares)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM funds WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
