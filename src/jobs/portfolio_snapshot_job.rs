use crate::errors::AppError;
use crate::services::job_scheduler_service::{JobContext, JobResult};
use crate::services::snapshot_service;

/// Daily valuation snapshot sweep over all active portfolios.
pub async fn run(ctx: JobContext) -> Result<JobResult, AppError> {
    let (processed, failed) = snapshot_service::snapshot_all_portfolios(&ctx.pool).await?;
    Ok(JobResult {
        items_processed: processed as i32,
        items_failed: failed as i32,
    })
}
