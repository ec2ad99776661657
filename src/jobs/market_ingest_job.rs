use tracing::warn;

use crate::errors::AppError;
use crate::services::ingest_service;
use crate::services::job_scheduler_service::{JobContext, JobResult};

/// Scheduled ingestion tick. An overlapping run is not an error: the lock
/// holder wins and this tick reports zero work.
pub async fn run(ctx: JobContext) -> Result<JobResult, AppError> {
    match ingest_service::ingest(&ctx.pool, ctx.market_provider.as_ref(), &ctx.ingest_lock).await {
        Ok(report) => Ok(JobResult {
            items_processed: report.succeeded as i32,
            items_failed: report.failed as i32,
        }),
        Err(AppError::Conflict(_)) => {
            warn!("Ingestion already in progress, skipping this tick");
            Ok(JobResult {
                items_processed: 0,
                items_failed: 0,
            })
        }
        Err(e) => Err(e),
    }
}
