use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::db;
use crate::errors::AppError;
use crate::external::market_provider::{MarketProvider, MarketProviderError};
use crate::models::NewPriceSnapshot;

/// Outcome of one ingestion run.
#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped_duplicates: usize,
    pub failed: usize,
}

/// One idempotent ingestion pass: fetch the market snapshot, upsert
/// instruments, append non-duplicate price rows.
///
/// The run lock keeps overlapping scheduled runs from double-calling the
/// API; a second caller gets a Conflict and should skip. All rows of one run
/// land in a single database transaction. Malformed feed entries count as
/// failures and the run continues without them.
pub async fn ingest(
    pool: &PgPool,
    provider: &dyn MarketProvider,
    run_lock: &Mutex<()>,
) -> Result<IngestReport, AppError> {
    let _guard = run_lock
        .try_lock()
        .map_err(|_| AppError::Conflict("Market ingestion already running".into()))?;

    let batch = provider.fetch_quotes().await.map_err(|e| match e {
        MarketProviderError::RateLimited => AppError::RateLimited,
        other => AppError::External(other.to_string()),
    })?;

    let mut report = IngestReport {
        attempted: batch.quotes.len() + batch.malformed,
        failed: batch.malformed,
        ..Default::default()
    };

    info!(
        "Ingesting {} quote(s), {} malformed entr(ies) skipped by provider",
        batch.quotes.len(),
        batch.malformed
    );

    let mut tx = pool.begin().await?;

    for quote in batch.quotes {
        let instrument = db::instrument_queries::upsert_by_code(
            &mut tx,
            &quote.code,
            &quote.name,
            quote.icon_url.as_deref(),
        )
        .await?;

        let incoming = NewPriceSnapshot {
            instrument_id: instrument.id,
            price: quote.price,
            change_pct: quote.change_pct,
            volume: quote.volume,
            min_price: quote.min_price,
            max_price: quote.max_price,
            exchange_time: quote.exchange_time,
        };

        let latest = db::price_queries::fetch_latest_for_exchange_time(
            &mut tx,
            instrument.id,
            &incoming.exchange_time,
        )
        .await?;

        if latest.map(|l| l.is_repeat_of(&incoming)).unwrap_or(false) {
            report.skipped_duplicates += 1;
            continue;
        }

        db::price_queries::insert(&mut tx, incoming).await?;
        report.succeeded += 1;
    }

    tx.commit().await?;

    if report.failed > 0 {
        warn!(
            "Ingestion finished with partial success: {}/{} stored, {} duplicate(s), {} failed",
            report.succeeded, report.attempted, report.skipped_duplicates, report.failed
        );
    } else {
        info!(
            "Ingestion finished: {}/{} stored, {} duplicate(s) suppressed",
            report.succeeded, report.attempted, report.skipped_duplicates
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::models::{NewPriceSnapshot, PriceSnapshot};
    use bigdecimal::BigDecimal;
    use uuid::Uuid;

    fn stored(price: i64, change: i64, time: &str) -> PriceSnapshot {
        PriceSnapshot {
            id: 1,
            instrument_id: Uuid::nil(),
            price: BigDecimal::from(price),
            change_pct: BigDecimal::from(change),
            volume: None,
            min_price: None,
            max_price: None,
            exchange_time: time.to_string(),
            ingested_at: chrono::Utc::now(),
        }
    }

    fn incoming(price: i64, change: i64, time: &str) -> NewPriceSnapshot {
        NewPriceSnapshot {
            instrument_id: Uuid::nil(),
            price: BigDecimal::from(price),
            change_pct: BigDecimal::from(change),
            volume: None,
            min_price: None,
            max_price: None,
            exchange_time: time.to_string(),
        }
    }

    #[test]
    fn identical_snapshot_is_suppressed() {
        let latest = stored(100, 2, "18:10");
        assert!(latest.is_repeat_of(&incoming(100, 2, "18:10")));
    }

    #[test]
    fn price_move_is_not_a_duplicate() {
        let latest = stored(100, 2, "18:10");
        assert!(!latest.is_repeat_of(&incoming(101, 2, "18:10")));
    }

    #[test]
    fn new_exchange_time_is_not_a_duplicate() {
        let latest = stored(100, 2, "18:10");
        assert!(!latest.is_repeat_of(&incoming(100, 2, "18:20")));
    }
}
