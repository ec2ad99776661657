use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{CreateTransaction, Transaction, TransactionKind, UpdateTransaction};
use crate::services::propagation::{self, ChangeEvent};

// Transactions are the main leaf writes of the system. Every mutation here
// runs its whole propagation chain inside one database transaction: the row
// write, the position replay, the fund aggregation and the investor rollup
// commit together or not at all.

fn validate_amounts(
    kind: TransactionKind,
    price: &BigDecimal,
    quantity: &BigDecimal,
    commission: &BigDecimal,
    tax: &BigDecimal,
) -> Result<(), AppError> {
    let zero = BigDecimal::from(0);

    match kind {
        TransactionKind::Buy | TransactionKind::Sell => {
            if quantity <= &zero {
                return Err(AppError::Validation("Quantity must be > 0".into()));
            }
            if price <= &zero {
                return Err(AppError::Validation("Price must be > 0".into()));
            }
        }
        TransactionKind::Split | TransactionKind::Merger => {
            // price carries the ratio for corporate actions
            if price <= &zero {
                return Err(AppError::Validation("Ratio must be > 0".into()));
            }
        }
        TransactionKind::Dividend | TransactionKind::Rights => {
            if quantity < &zero || price < &zero {
                return Err(AppError::Validation("Amounts cannot be negative".into()));
            }
        }
    }

    if commission < &zero || tax < &zero {
        return Err(AppError::Validation(
            "Commission and tax cannot be negative".into(),
        ));
    }

    Ok(())
}

pub async fn create(
    pool: &PgPool,
    portfolio_id: Uuid,
    input: CreateTransaction,
) -> Result<Transaction, AppError> {
    validate_amounts(
        input.kind,
        &input.price,
        &input.quantity,
        &input.commission,
        &input.tax,
    )?;

    let portfolio = db::portfolio_queries::fetch_one(pool, portfolio_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;

    let instrument = db::instrument_queries::fetch_one(pool, input.instrument_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Instrument not found".to_string()))?;

    // unset investor defaults to the portfolio's investor
    let investor_id = input.investor_id.or(portfolio.investor_id);

    let transaction = Transaction {
        id: Uuid::new_v4(),
        portfolio_id,
        instrument_id: instrument.id,
        investor_id,
        kind: input.kind,
        date: input.date,
        price: input.price,
        quantity: input.quantity,
        commission: input.commission,
        tax: input.tax,
        notes: input.notes,
        created_at: chrono::Utc::now(),
    };

    let mut tx = pool.begin().await?;
    let inserted = db::transaction_queries::insert(&mut tx, transaction).await?;
    propagation::run(
        &mut tx,
        vec![ChangeEvent::TransactionChanged {
            portfolio_id,
            instrument_id: inserted.instrument_id,
            investor_id: inserted.investor_id,
        }],
    )
    .await
    .map_err(|e| {
        error!("Propagation failed for transaction insert: {}", e);
        e
    })?;
    tx.commit().await?;

    Ok(inserted)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: UpdateTransaction,
) -> Result<Transaction, AppError> {
    validate_amounts(
        input.kind,
        &input.price,
        &input.quantity,
        &input.commission,
        &input.tax,
    )?;

    let mut tx = pool.begin().await?;

    let existing = db::transaction_queries::fetch_one_conn(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    let updated = db::transaction_queries::update(&mut tx, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    propagation::run(
        &mut tx,
        vec![ChangeEvent::TransactionChanged {
            portfolio_id: existing.portfolio_id,
            instrument_id: existing.instrument_id,
            investor_id: existing.investor_id,
        }],
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let existing = db::transaction_queries::fetch_one_conn(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    db::transaction_queries::delete(&mut tx, id).await?;

    propagation::run(
        &mut tx,
        vec![ChangeEvent::TransactionChanged {
            portfolio_id: existing.portfolio_id,
            instrument_id: existing.instrument_id,
            investor_id: existing.investor_id,
        }],
    )
    .await?;
    tx.commit().await?;

    Ok(())
}

pub async fn list_for_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<Vec<Transaction>, AppError> {
    let transactions = db::transaction_queries::fetch_for_portfolio(pool, portfolio_id).await?;
    Ok(transactions)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Transaction, AppError> {
    db::transaction_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_quantity_buy() {
        let err = validate_amounts(
            TransactionKind::Buy,
            &BigDecimal::from(10),
            &BigDecimal::from(0),
            &BigDecimal::from(0),
            &BigDecimal::from(0),
        );
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_negative_commission() {
        let err = validate_amounts(
            TransactionKind::Sell,
            &BigDecimal::from(10),
            &BigDecimal::from(5),
            &BigDecimal::from(-1),
            &BigDecimal::from(0),
        );
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn split_needs_positive_ratio() {
        let err = validate_amounts(
            TransactionKind::Split,
            &BigDecimal::from(0),
            &BigDecimal::from(0),
            &BigDecimal::from(0),
            &BigDecimal::from(0),
        );
        assert!(matches!(err, Err(AppError::Validation(_))));

        let ok = validate_amounts(
            TransactionKind::Split,
            &BigDecimal::from(2),
            &BigDecimal::from(0),
            &BigDecimal::from(0),
            &BigDecimal::from(0),
        );
        assert!(ok.is_ok());
    }
}
