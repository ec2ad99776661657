use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PortfolioSnapshot, PortfolioValuation};

/// One snapshot per portfolio per day; re-running the job on the same day
/// overwrites that day's row.
pub async fn upsert_for_day(
    pool: &PgPool,
    portfolio_id: Uuid,
    date: NaiveDate,
    valuation: &PortfolioValuation,
) -> Result<PortfolioSnapshot, sqlx::Error> {
    sqlx::query_as::<_, PortfolioSnapshot>(
        "INSERT INTO portfolio_snapshots
             (id, portfolio_id, date, total_value, total_cost, profit_loss, profit_loss_pct)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (portfolio_id, date)
         DO UPDATE SET total_value = EXCLUDED.total_value,
                       total_cost = EXCLUDED.total_cost,
                       profit_loss = EXCLUDED.profit_loss,
                       profit_loss_pct = EXCLUDED.profit_loss_pct
         RETURNING id, portfolio_id, date, total_value, total_cost, profit_loss, profit_loss_pct",
    )
    .bind(Uuid::new_v4())
    .bind(portfolio_id)
    .bind(date)
    .bind(&valuation.total_current_value)
    .bind(&valuation.total_cost)
    .bind(&valuation.profit_loss)
    .bind(&valuation.profit_loss_pct)
    .fetch_one(pool)
    .await
}

pub async fn fetch_for_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<Vec<PortfolioSnapshot>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioSnapshot>(
        "SELECT id, portfolio_id, date, total_value, total_cost, profit_loss, profit_loss_pct
         FROM portfolio_snapshots
         WHERE portfolio_id = $1
         ORDER BY date DESC",
    )
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}
