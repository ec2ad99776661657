use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    CreateInvestor, FundShareValuation, InvestedSource, Investor, InvestorSummary, UpdateInvestor,
};
use crate::services::{fund_service, propagation};

pub async fn create(pool: &PgPool, input: CreateInvestor) -> Result<Investor, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Investor name cannot be empty".into()));
    }
    let investor = db::investor_queries::insert(pool, Investor::new(input)).await?;
    Ok(investor)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Investor>, AppError> {
    let investors = db::investor_queries::fetch_all(pool).await?;
    Ok(investors)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Investor, AppError> {
    db::investor_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateInvestor) -> Result<Investor, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Investor name cannot be empty".into()));
    }
    db::investor_queries::update(pool, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))
}

/// Deleting an investor redeems every fund share they hold (rolling the
/// funds' ledgers back) in the same transaction as the delete. Portfolio and
/// transaction references null out; investment rows cascade away.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let investor = db::investor_queries::fetch_one_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))?;

    let shares = db::fund_share_queries::fetch_for_investor_conn(&mut tx, id).await?;
    for share in &shares {
        let fund = db::fund_queries::fetch_one_for_update(&mut tx, share.fund_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fund not found".to_string()))?;
        let (initial, current, total) = fund_service::apply_redemption(&fund, share);
        db::fund_share_queries::delete(&mut tx, share.id).await?;
        db::fund_queries::set_share_ledger_values(&mut tx, fund.id, &initial, &current, &total)
            .await?;
    }

    db::investor_queries::delete(&mut tx, id).await?;
    tx.commit().await?;

    info!(
        "Deleted investor {} and redeemed {} fund share holding(s)",
        investor.id,
        shares.len()
    );
    Ok(())
}

/// Recompute the cached total through the investor's configured source, or
/// an explicit override. Both computations stay individually reachable; this
/// is the only place the projection is rewritten on demand.
pub async fn recompute_total(
    pool: &PgPool,
    id: Uuid,
    source_override: Option<InvestedSource>,
) -> Result<Investor, AppError> {
    let mut tx = pool.begin().await?;

    let investor = db::investor_queries::fetch_one_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))?;

    let source = source_override.unwrap_or(investor.invested_source);
    let total = propagation::total_invested_for(&mut tx, id, source).await?;
    db::investor_queries::set_total_invested(&mut tx, id, &total).await?;

    tx.commit().await?;
    fetch_one(pool, id).await
}

pub async fn list_share_valuations(
    pool: &PgPool,
    id: Uuid,
) -> Result<Vec<FundShareValuation>, AppError> {
    let shares = db::fund_share_queries::fetch_for_investor(pool, id).await?;

    let mut valuations = Vec::with_capacity(shares.len());
    for share in &shares {
        let fund = db::fund_queries::fetch_one(pool, share.fund_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fund not found".to_string()))?;
        valuations.push(fund_service::value_share(&fund, share));
    }
    Ok(valuations)
}

/// Read-time rollup: claim value is the sum of fund share worths; profit and
/// loss compare it against the cached contribution total.
pub async fn summary(pool: &PgPool, id: Uuid) -> Result<InvestorSummary, AppError> {
    let investor = fetch_one(pool, id).await?;
    let share_valuations = list_share_valuations(pool, id).await?;

    let zero = BigDecimal::from(0);
    let mut current_portfolio_value = zero.clone();
    for v in &share_valuations {
        current_portfolio_value += &v.current_value;
    }

    let profit_loss = &current_portfolio_value - &investor.total_invested;
    let profit_loss_pct = if investor.total_invested == zero {
        zero
    } else {
        &profit_loss / &investor.total_invested * BigDecimal::from(100)
    };

    Ok(InvestorSummary {
        investor_id: investor.id,
        name: investor.name,
        invested_source: investor.invested_source,
        total_invested: investor.total_invested,
        current_portfolio_value,
        profit_loss,
        profit_loss_pct,
    })
}
