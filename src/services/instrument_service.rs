use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreateInstrument, Instrument, PriceSnapshot};

pub async fn create(pool: &PgPool, input: CreateInstrument) -> Result<Instrument, AppError> {
    let code = input.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::Validation("Instrument code cannot be empty".into()));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Instrument name cannot be empty".into()));
    }

    if db::instrument_queries::fetch_by_code(pool, &code).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Instrument {} already exists",
            code
        )));
    }

    let instrument = db::instrument_queries::insert(
        pool,
        Instrument::new(code, input.name, input.icon_url),
    )
    .await?;
    Ok(instrument)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Instrument>, AppError> {
    let instruments = db::instrument_queries::fetch_all(pool).await?;
    Ok(instruments)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Instrument, AppError> {
    db::instrument_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Instrument not found".to_string()))
}

pub async fn latest_price(pool: &PgPool, id: Uuid) -> Result<PriceSnapshot, AppError> {
    fetch_one(pool, id).await?;
    db::price_queries::fetch_latest(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("No price data for instrument".to_string()))
}

pub async fn price_history(
    pool: &PgPool,
    id: Uuid,
    limit: i64,
) -> Result<Vec<PriceSnapshot>, AppError> {
    fetch_one(pool, id).await?;
    let history = db::price_queries::fetch_history(pool, id, limit).await?;
    Ok(history)
}

/// Instruments referenced by positions or transactions cannot be removed;
/// the foreign keys restrict the delete and it surfaces as a conflict.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    match db::instrument_queries::delete(pool, id).await {
        Ok(0) => Err(AppError::NotFound("Instrument not found".to_string())),
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
            Err(AppError::Conflict(
                "Instrument is referenced by positions or transactions".into(),
            ))
        }
        Err(e) => Err(AppError::Db(e)),
    }
}
