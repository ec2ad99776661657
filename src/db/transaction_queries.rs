use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::{Transaction, UpdateTransaction};

const COLUMNS: &str = "id, portfolio_id, instrument_id, investor_id, kind, date, price, \
                       quantity, commission, tax, notes, created_at";

pub async fn insert(
    conn: &mut PgConnection,
    tx: Transaction,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "INSERT INTO transactions
             (id, portfolio_id, instrument_id, investor_id, kind, date, price, quantity,
              commission, tax, notes, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING {}",
        COLUMNS
    ))
    .bind(tx.id)
    .bind(tx.portfolio_id)
    .bind(tx.instrument_id)
    .bind(tx.investor_id)
    .bind(tx.kind)
    .bind(tx.date)
    .bind(tx.price)
    .bind(tx.quantity)
    .bind(tx.commission)
    .bind(tx.tax)
    .bind(tx.notes)
    .bind(tx.created_at)
    .fetch_one(conn)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions WHERE id = $1",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_one_conn(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions WHERE id = $1",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn update(
    conn: &mut PgConnection,
    id: Uuid,
    input: UpdateTransaction,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "UPDATE transactions
         SET kind = $2, date = $3, price = $4, quantity = $5, commission = $6, tax = $7,
             notes = $8
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    ))
    .bind(id)
    .bind(input.kind)
    .bind(input.date)
    .bind(input.price)
    .bind(input.quantity)
    .bind(input.commission)
    .bind(input.tax)
    .bind(input.notes)
    .fetch_optional(conn)
    .await
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Complete history for one (portfolio, instrument) pair in replay order:
/// transaction date ascending, creation order breaking equal-date ties.
pub async fn fetch_pair_ordered(
    conn: &mut PgConnection,
    portfolio_id: Uuid,
    instrument_id: Uuid,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions
         WHERE portfolio_id = $1 AND instrument_id = $2
         ORDER BY date ASC, created_at ASC, id ASC",
        COLUMNS
    ))
    .bind(portfolio_id)
    .bind(instrument_id)
    .fetch_all(conn)
    .await
}

pub async fn fetch_for_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions WHERE portfolio_id = $1 ORDER BY date DESC",
        COLUMNS
    ))
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

/// Every transaction across all portfolios owned by an investor, feeding the
/// transactions-based rollup.
pub async fn fetch_for_investor_portfolios(
    conn: &mut PgConnection,
    investor_id: Uuid,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {} FROM transactions t
         JOIN portfolios p ON p.id = t.portfolio_id
         WHERE p.investor_id = $1",
        COLUMNS_QUALIFIED
    ))
    .bind(investor_id)
    .fetch_all(conn)
    .await
}

const COLUMNS_QUALIFIED: &str = "t.id, t.portfolio_id, t.instrument_id, t.investor_id, t.kind, \
                                 t.date, t.price, t.quantity, t.commission, t.tax, t.notes, \
                                 t.created_at";
