use chrono::Utc;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::PortfolioSnapshot;
use crate::services::valuation_service;

/// Write today's valuation snapshot for every active portfolio. One
/// portfolio failing does not stop the sweep.
pub async fn snapshot_all_portfolios(pool: &PgPool) -> Result<(u32, u32), AppError> {
    let portfolio_ids = db::portfolio_queries::fetch_active_ids(pool).await?;

    let mut processed = 0;
    let mut failed = 0;

    for portfolio_id in portfolio_ids {
        match snapshot_portfolio(pool, portfolio_id).await {
            Ok(_) => processed += 1,
            Err(e) => {
                error!("Failed to snapshot portfolio {}: {}", portfolio_id, e);
                failed += 1;
            }
        }
    }

    Ok((processed, failed))
}

pub async fn snapshot_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<PortfolioSnapshot, AppError> {
    let valuation = valuation_service::portfolio_valuation(pool, portfolio_id).await?;
    let today = Utc::now().date_naive();

    let snapshot =
        db::portfolio_snapshot_queries::upsert_for_day(pool, portfolio_id, today, &valuation)
            .await?;
    Ok(snapshot)
}

pub async fn history(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<PortfolioSnapshot>, AppError> {
    let snapshots = db::portfolio_snapshot_queries::fetch_for_portfolio(pool, portfolio_id).await?;
    Ok(snapshots)
}
