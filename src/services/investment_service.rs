use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{BulkDeleteInvestments, CreateInvestment, Investment, UpdateInvestment};
use crate::services::propagation::{self, ChangeEvent};

// Cash contribution records. Every write schedules the owning investor's
// rollup in the same transaction; bulk deletes roll up each affected
// investor exactly once.

pub async fn create(pool: &PgPool, input: CreateInvestment) -> Result<Investment, AppError> {
    if input.amount <= BigDecimal::from(0) {
        return Err(AppError::Validation("Amount must be > 0".into()));
    }

    let investor = db::investor_queries::fetch_one(pool, input.investor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))?;

    let investment = Investment {
        id: Uuid::new_v4(),
        investor_id: investor.id,
        amount: input.amount,
        date: input.date,
        kind: input.kind,
        notes: input.notes,
        created_at: chrono::Utc::now(),
    };

    let mut tx = pool.begin().await?;
    let inserted = db::investment_queries::insert(&mut tx, investment).await?;
    propagation::run(
        &mut tx,
        vec![ChangeEvent::InvestmentChanged {
            investor_id: inserted.investor_id,
        }],
    )
    .await?;
    tx.commit().await?;

    Ok(inserted)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Investment, AppError> {
    db::investment_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investment not found".to_string()))
}

pub async fn list_for_investor(
    pool: &PgPool,
    investor_id: Uuid,
) -> Result<Vec<Investment>, AppError> {
    let investments = db::investment_queries::fetch_for_investor(pool, investor_id).await?;
    Ok(investments)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdateInvestment,
) -> Result<Investment, AppError> {
    if input.amount <= BigDecimal::from(0) {
        return Err(AppError::Validation("Amount must be > 0".into()));
    }

    let mut tx = pool.begin().await?;
    let updated = db::investment_queries::update(&mut tx, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Investment not found".to_string()))?;
    propagation::run(
        &mut tx,
        vec![ChangeEvent::InvestmentChanged {
            investor_id: updated.investor_id,
        }],
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let investor_id = db::investment_queries::delete(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investment not found".to_string()))?;
    propagation::run(&mut tx, vec![ChangeEvent::InvestmentChanged { investor_id }]).await?;
    tx.commit().await?;
    Ok(())
}

/// Delete a batch of investment rows in one transaction. The returned
/// investor ids may repeat; the orchestrator recomputes each affected
/// investor once.
pub async fn bulk_delete(pool: &PgPool, input: BulkDeleteInvestments) -> Result<u64, AppError> {
    if input.ids.is_empty() {
        return Err(AppError::Validation("No investment ids given".into()));
    }

    let mut tx = pool.begin().await?;
    let investor_ids = db::investment_queries::bulk_delete(&mut tx, &input.ids).await?;
    let deleted = investor_ids.len() as u64;

    if !investor_ids.is_empty() {
        propagation::run(
            &mut tx,
            vec![ChangeEvent::InvestmentsBulkDeleted { investor_ids }],
        )
        .await?;
    }

    tx.commit().await?;
    Ok(deleted)
}
