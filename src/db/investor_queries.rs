use bigdecimal::BigDecimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Investor, UpdateInvestor};

const COLUMNS: &str = "id, name, phone, email, tax_id, risk_profile, investment_goal, notes, \
                       total_invested, invested_source, start_date, monthly_contribution, \
                       created_at, updated_at";

pub async fn insert(pool: &PgPool, investor: Investor) -> Result<Investor, sqlx::Error> {
    sqlx::query_as::<_, Investor>(&format!(
        "INSERT INTO investors
             (id, name, phone, email, tax_id, risk_profile, investment_goal, notes,
              total_invested, invested_source, start_date, monthly_contribution,
              created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING {}",
        COLUMNS
    ))
    .bind(investor.id)
    .bind(investor.name)
    .bind(investor.phone)
    .bind(investor.email)
    .bind(investor.tax_id)
    .bind(investor.risk_profile)
    .bind(investor.investment_goal)
    .bind(investor.notes)
    .bind(investor.total_invested)
    .bind(investor.invested_source)
    .bind(investor.start_date)
    .bind(investor.monthly_contribution)
    .bind(investor.created_at)
    .bind(investor.updated_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Investor>, sqlx::Error> {
    sqlx::query_as::<_, Investor>(&format!("SELECT {} FROM investors ORDER BY name", COLUMNS))
        .fetch_all(pool)
        .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Investor>, sqlx::Error> {
    sqlx::query_as::<_, Investor>(&format!("SELECT {} FROM investors WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lock and fetch an investor row ahead of a rollup rewrite.
pub async fn fetch_one_for_update(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Investor>, sqlx::Error> {
    sqlx::query_as::<_, Investor>(&format!(
        "SELECT {} FROM investors WHERE id = $1 FOR UPDATE",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdateInvestor,
) -> Result<Option<Investor>, sqlx::Error> {
    sqlx::query_as::<_, Investor>(&format!(
        "UPDATE investors
         SET name = $2, phone = $3, email = $4, tax_id = $5, risk_profile = $6,
             investment_goal = $7, notes = $8, invested_source = $9, start_date = $10,
             monthly_contribution = $11, updated_at = now()
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .bind(input.name)
    .bind(input.phone)
    .bind(input.email)
    .bind(input.tax_id)
    .bind(input.risk_profile)
    .bind(input.investment_goal)
    .bind(input.notes)
    .bind(input.invested_source)
    .bind(input.start_date)
    .bind(input.monthly_contribution)
    .fetch_optional(pool)
    .await
}

/// Rollup write: the cached projection is only ever rewritten here.
pub async fn set_total_invested(
    conn: &mut PgConnection,
    id: Uuid,
    total: &BigDecimal,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE investors SET total_invested = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(total)
            .execute(conn)
            .await?;
    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM investors WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
