use crate::errors::AppError;
use crate::services::job_scheduler_service::{JobContext, JobResult};
use crate::services::retention_service;

/// Full history is kept this many days; beyond it only each day's last row
/// per instrument survives.
const KEEP_DAYS: i64 = 30;

pub async fn run(ctx: JobContext) -> Result<JobResult, AppError> {
    let deleted = retention_service::prune_price_history(&ctx.pool, KEEP_DAYS).await?;
    Ok(JobResult {
        items_processed: deleted as i32,
        items_failed: 0,
    })
}
