use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreatePortfolio, Portfolio, UpdatePortfolio};
use crate::services::propagation::{self, ChangeEvent};

pub async fn create(pool: &PgPool, input: CreatePortfolio) -> Result<Portfolio, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Portfolio name cannot be empty".into()));
    }

    let fund_id = input.fund_id;
    let portfolio = db::portfolio_queries::insert(pool, Portfolio::new(input)).await?;

    // a portfolio born linked contributes to its fund immediately
    if let Some(fund_id) = fund_id {
        let mut tx = pool.begin().await?;
        propagation::run(&mut tx, vec![ChangeEvent::FundValueStale { fund_id }]).await?;
        tx.commit().await?;
    }

    Ok(portfolio)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Portfolio>, AppError> {
    let portfolios = db::portfolio_queries::fetch_all(pool).await?;
    Ok(portfolios)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Portfolio, AppError> {
    db::portfolio_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))
}

/// Update runs inside one transaction because a fund-link change fans out to
/// both the old and the new fund.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdatePortfolio,
) -> Result<Portfolio, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Portfolio name cannot be empty".into()));
    }

    let mut tx = pool.begin().await?;

    let existing = db::portfolio_queries::fetch_one_conn(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;

    let old_fund_id = existing.fund_id;
    let new_fund_id = input.fund_id;

    let updated = db::portfolio_queries::update(&mut tx, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;

    if old_fund_id != new_fund_id {
        propagation::run(
            &mut tx,
            vec![ChangeEvent::PortfolioFundLinkChanged {
                old_fund_id,
                new_fund_id,
            }],
        )
        .await?;
    }

    tx.commit().await?;
    Ok(updated)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existing = db::portfolio_queries::fetch_one_conn(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;

    let deleted = db::portfolio_queries::delete_conn(&mut tx, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Portfolio not found".to_string()));
    }

    // positions cascade away with the portfolio; the fund it fed loses a
    // contributor and must re-aggregate
    if let Some(fund_id) = existing.fund_id {
        propagation::run(&mut tx, vec![ChangeEvent::FundValueStale { fund_id }]).await?;
    }

    tx.commit().await?;
    Ok(())
}
