mod app;
mod config;
mod db;
mod errors;
mod external;
mod jobs;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::external::collectapi::CollectApiProvider;
use crate::external::market_provider::MarketProvider;
use crate::logging::{init_logging, LoggingConfig};
use crate::services::job_scheduler_service::JobSchedulerService;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let provider: Arc<dyn MarketProvider> = Arc::new(
        CollectApiProvider::new(config.collect_api_key.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create market provider: {}", e))?,
    );

    let ingest_lock = Arc::new(Mutex::new(()));

    let mut scheduler = JobSchedulerService::new(
        Arc::new(pool.clone()),
        provider.clone(),
        ingest_lock.clone(),
        config.scheduler_test_mode,
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create scheduler: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start scheduler: {}", e))?;

    let state = AppState {
        pool,
        market_provider: provider,
        ingest_lock,
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Fundfolio backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
