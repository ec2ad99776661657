use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::db;
use crate::errors::AppError;

/// Prune price history older than the cutoff down to one row per
/// (instrument, calendar day). Each instrument's single most recent row
/// survives no matter how old it is.
pub async fn prune_price_history(pool: &PgPool, keep_days: i64) -> Result<u64, AppError> {
    if keep_days < 1 {
        return Err(AppError::Validation("keep_days must be >= 1".into()));
    }

    let cutoff = Utc::now() - Duration::days(keep_days);
    let deleted = db::price_queries::prune_history(pool, cutoff).await?;

    info!(
        "Price retention pass removed {} row(s) older than {}",
        deleted, cutoff
    );
    Ok(deleted)
}
