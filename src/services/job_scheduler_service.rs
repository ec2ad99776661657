use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::market_provider::MarketProvider;
use crate::jobs::{market_ingest_job, portfolio_snapshot_job, snapshot_retention_job};

// Context passed to job functions
#[derive(Clone)]
pub struct JobContext {
    pub pool: Arc<PgPool>,
    pub market_provider: Arc<dyn MarketProvider>,
    pub ingest_lock: Arc<Mutex<()>>,
}

#[derive(Debug)]
pub struct JobResult {
    pub items_processed: i32,
    pub items_failed: i32,
}

pub struct JobSchedulerService {
    scheduler: JobScheduler,
    context: JobContext,
    test_mode: bool,
}

impl JobSchedulerService {
    pub async fn new(
        pool: Arc<PgPool>,
        market_provider: Arc<dyn MarketProvider>,
        ingest_lock: Arc<Mutex<()>>,
        test_mode: bool,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;

        let context = JobContext {
            pool,
            market_provider,
            ingest_lock,
        };

        Ok(Self {
            scheduler,
            context,
            test_mode,
        })
    }

    /// Register and start all scheduled jobs.
    pub async fn start(&mut self) -> Result<(), AppError> {
        info!("🚀 Starting job scheduler...");

        if self.test_mode {
            info!("⚠️  JOB SCHEDULER IN TEST MODE - jobs run every few minutes!");
        }

        // Market ingestion during trading hours (format: sec min hour day month weekday).
        // Overlap protection lives in the ingest run lock, not in the cron spacing.
        let ingest_schedule = if self.test_mode {
            "0 */1 * * * *".to_string()
        } else {
            std::env::var("INGEST_SCHEDULE")
                .unwrap_or_else(|_| "0 */15 7-18 * * MON-FRI".to_string())
        };
        let ingest_desc = if self.test_mode {
            "Every minute (TEST MODE)"
        } else {
            "Every 15 minutes during trading hours"
        };

        self.schedule_job(
            &ingest_schedule,
            "market_ingest",
            ingest_desc,
            market_ingest_job::run,
        )
        .await?;

        // Daily valuation snapshots after close
        let snapshot_schedule = if self.test_mode { "0 */2 * * * *" } else { "0 15 18 * * MON-FRI" };
        let snapshot_desc = if self.test_mode {
            "Every 2 minutes (TEST MODE)"
        } else {
            "Daily at 6:15 PM"
        };

        self.schedule_job(
            snapshot_schedule,
            "portfolio_snapshots",
            snapshot_desc,
            portfolio_snapshot_job::run,
        )
        .await?;

        // Weekly price-history retention
        let retention_schedule = if self.test_mode { "0 */3 * * * *" } else { "0 0 3 * * SUN" };
        let retention_desc = if self.test_mode {
            "Every 3 minutes (TEST MODE)"
        } else {
            "Every Sunday at 3:00 AM"
        };

        self.schedule_job(
            retention_schedule,
            "snapshot_retention",
            retention_desc,
            snapshot_retention_job::run,
        )
        .await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;

        info!("✅ Job scheduler started with 3 jobs");
        Ok(())
    }

    #[allow(dead_code)]
    pub async fn stop(&mut self) -> Result<(), AppError> {
        info!("🛑 Stopping job scheduler...");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::External(format!("Failed to stop scheduler: {}", e)))?;
        Ok(())
    }

    async fn schedule_job<F, Fut>(
        &mut self,
        schedule: &str,
        job_name: &'static str,
        description: &str,
        job_fn: F,
    ) -> Result<(), AppError>
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<JobResult, AppError>> + Send + 'static,
    {
        let context = self.context.clone();
        let job_fn = Arc::new(job_fn);

        let job = Job::new_async(schedule, move |_uuid, _l| {
            let context = context.clone();
            let job_fn = job_fn.clone();
            Box::pin(async move {
                run_logged(job_name, context, job_fn).await;
            })
        })
        .map_err(|e| AppError::External(format!("Failed to create job {}: {}", job_name, e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::External(format!("Failed to add job {}: {}", job_name, e)))?;

        info!("📅 Scheduled: {} - {} [cron: {}]", job_name, description, schedule);
        Ok(())
    }
}

async fn run_logged<F, Fut>(job_name: &str, context: JobContext, job_fn: Arc<F>)
where
    F: Fn(JobContext) -> Fut,
    Fut: std::future::Future<Output = Result<JobResult, AppError>>,
{
    info!("🏃 Starting job: {}", job_name);
    let started_at = Utc::now();

    let result = job_fn(context).await;
    let duration_ms = (Utc::now() - started_at).num_milliseconds();

    match result {
        Ok(job_result) => {
            info!(
                "✅ Job completed: {} (processed: {}, failed: {}, duration: {}ms)",
                job_name, job_result.items_processed, job_result.items_failed, duration_ms
            );
        }
        Err(e) => {
            // a failed run is logged and skipped; the next tick tries again
            error!("❌ Job failed: {} - {} ({}ms)", job_name, e, duration_ms);
        }
    }
}
