use bigdecimal::BigDecimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    CreateFund, CreateFundShare, Fund, FundShare, FundShareValuation, FundValuation, UpdateFund,
    UpdateFundShare,
};
use crate::services::propagation::{self, ChangeEvent};

// Fund CRUD plus the fund share ledger. Share issuance and redemption move
// the fund's initial_value / current_value / total_shares as one atomic unit
// with the share row itself; the share-count math is always done here, never
// accepted from callers.

pub async fn create(pool: &PgPool, input: CreateFund) -> Result<Fund, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Fund name cannot be empty".into()));
    }
    let fund = db::fund_queries::insert(pool, Fund::new(input)).await?;
    Ok(fund)
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Fund>, AppError> {
    let funds = db::fund_queries::fetch_all(pool).await?;
    Ok(funds)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Fund, AppError> {
    db::fund_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Fund not found".to_string()))
}

pub async fn update(pool: &PgPool, id: Uuid, input: UpdateFund) -> Result<Fund, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Fund name cannot be empty".into()));
    }
    db::fund_queries::update(pool, id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Fund not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    match db::fund_queries::delete(pool, id).await? {
        0 => Err(AppError::NotFound("Fund not found".to_string())),
        _ => Ok(()),
    }
}

/// Force a re-aggregation from linked portfolios and return the fresh fund.
pub async fn refresh(pool: &PgPool, id: Uuid) -> Result<Fund, AppError> {
    let mut tx = pool.begin().await?;
    propagation::run(&mut tx, vec![ChangeEvent::FundValueStale { fund_id: id }]).await?;
    tx.commit().await?;

    fetch_one(pool, id).await
}

pub async fn valuation(pool: &PgPool, id: Uuid) -> Result<FundValuation, AppError> {
    let fund = fetch_one(pool, id).await?;
    Ok(FundValuation {
        fund_id: fund.id,
        share_value: fund.share_value(),
        total_return_amount: fund.total_return_amount(),
        total_return_pct: fund.total_return_pct(),
        initial_value: fund.initial_value,
        current_value: fund.current_value,
        total_shares: fund.total_shares,
    })
}

// --- share ledger ---------------------------------------------------------

/// Share count bought by an investment at the fund's prevailing share value.
/// A fund with no shares outstanding seeds at exactly 1 currency unit per
/// share, so the first investor's count equals their investment.
pub(crate) fn compute_shares(
    initial_investment: &BigDecimal,
    current_value: &BigDecimal,
    total_shares: &BigDecimal,
) -> BigDecimal {
    let zero = BigDecimal::from(0);
    if initial_investment <= &zero {
        return zero;
    }
    if total_shares > &zero {
        let share_value = current_value / total_shares;
        initial_investment / share_value
    } else {
        initial_investment.clone()
    }
}

fn clamp_zero(value: BigDecimal) -> BigDecimal {
    let zero = BigDecimal::from(0);
    if value < zero {
        zero
    } else {
        value
    }
}

/// Fund fields after redemption of a share: initial value drops by the
/// original investment, current value by the share's current worth, shares
/// by the share count. All clamped at zero.
pub(crate) fn apply_redemption(
    fund: &Fund,
    share: &FundShare,
) -> (BigDecimal, BigDecimal, BigDecimal) {
    let share_value = fund.share_value();
    let redeemed_value = &share.shares_count * &share_value;

    let initial = clamp_zero(&fund.initial_value - &share.initial_investment);
    let current = clamp_zero(&fund.current_value - &redeemed_value);
    let shares = clamp_zero(&fund.total_shares - &share.shares_count);
    (initial, current, shares)
}

pub async fn list_shares(pool: &PgPool, fund_id: Uuid) -> Result<Vec<FundShareValuation>, AppError> {
    let fund = fetch_one(pool, fund_id).await?;
    let shares = db::fund_share_queries::fetch_for_fund(pool, fund_id).await?;
    Ok(shares.iter().map(|s| value_share(&fund, s)).collect())
}

/// Read-time worth of one share holding at the fund's current share value.
pub(crate) fn value_share(fund: &Fund, share: &FundShare) -> FundShareValuation {
    let zero = BigDecimal::from(0);
    let current_value = if fund.total_shares == zero {
        zero.clone()
    } else {
        &share.shares_count * &(&fund.current_value / &fund.total_shares)
    };
    let profit_loss = &current_value - &share.initial_investment;
    let profit_loss_pct = if share.initial_investment > zero {
        &profit_loss / &share.initial_investment * BigDecimal::from(100)
    } else {
        zero
    };

    FundShareValuation {
        share_id: share.id,
        fund_id: share.fund_id,
        investor_id: share.investor_id,
        shares_count: share.shares_count.clone(),
        initial_investment: share.initial_investment.clone(),
        current_value,
        profit_loss,
        profit_loss_pct,
    }
}

pub async fn create_share(
    pool: &PgPool,
    fund_id: Uuid,
    input: CreateFundShare,
) -> Result<FundShare, AppError> {
    if input.initial_investment <= BigDecimal::from(0) {
        return Err(AppError::Validation("Investment must be > 0".into()));
    }

    let mut tx = pool.begin().await?;

    // investor before fund, matching the lock order of investor deletion
    let investor = db::investor_queries::fetch_one_for_update(&mut tx, input.investor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Investor not found".to_string()))?;

    let fund = db::fund_queries::fetch_one_for_update(&mut tx, fund_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Fund not found".to_string()))?;

    if db::fund_share_queries::exists_for_fund_investor(&mut tx, fund_id, investor.id).await? {
        return Err(AppError::Conflict(
            "Investor already holds shares in this fund".into(),
        ));
    }

    let shares_count = compute_shares(
        &input.initial_investment,
        &fund.current_value,
        &fund.total_shares,
    );

    let share = FundShare {
        id: Uuid::new_v4(),
        fund_id,
        investor_id: investor.id,
        shares_count: shares_count.clone(),
        initial_investment: input.initial_investment.clone(),
        entry_date: input.entry_date,
        notes: input.notes,
        last_updated: chrono::Utc::now(),
    };
    let inserted = db::fund_share_queries::insert(&mut tx, &share).await?;

    // issuance moves the fund ledger with the share row
    let initial = &fund.initial_value + &input.initial_investment;
    let current = &fund.current_value + &input.initial_investment;
    let total = &fund.total_shares + &shares_count;
    db::fund_queries::set_share_ledger_values(&mut tx, fund_id, &initial, &current, &total).await?;

    tx.commit().await?;

    info!(
        "Issued {} shares of fund {} to investor {}",
        inserted.shares_count, fund_id, inserted.investor_id
    );
    Ok(inserted)
}

/// Correct a share's investment amount. The count is recomputed at the
/// fund's current share value, not the value at original entry; the fund's
/// own ledger fields stay untouched.
pub async fn update_share(
    pool: &PgPool,
    fund_id: Uuid,
    share_id: Uuid,
    input: UpdateFundShare,
) -> Result<FundShare, AppError> {
    if input.initial_investment <= BigDecimal::from(0) {
        return Err(AppError::Validation("Investment must be > 0".into()));
    }

    let mut tx = pool.begin().await?;

    let share = db::fund_share_queries::fetch_one_for_update(&mut tx, share_id)
        .await?
        .filter(|s| s.fund_id == fund_id)
        .ok_or_else(|| AppError::NotFound("Fund share not found".to_string()))?;

    let fund = db::fund_queries::fetch_one_for_update(&mut tx, share.fund_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Fund not found".to_string()))?;

    let shares_count = compute_shares(
        &input.initial_investment,
        &fund.current_value,
        &fund.total_shares,
    );

    let updated = db::fund_share_queries::update_investment(
        &mut tx,
        share_id,
        &input.initial_investment,
        &shares_count,
        input.notes.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Fund share not found".to_string()))?;

    tx.commit().await?;
    Ok(updated)
}

pub async fn delete_share(pool: &PgPool, fund_id: Uuid, share_id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let share = db::fund_share_queries::fetch_one_for_update(&mut tx, share_id)
        .await?
        .filter(|s| s.fund_id == fund_id)
        .ok_or_else(|| AppError::NotFound("Fund share not found".to_string()))?;

    let fund = db::fund_queries::fetch_one_for_update(&mut tx, share.fund_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Fund not found".to_string()))?;

    let (initial, current, total) = apply_redemption(&fund, &share);

    db::fund_share_queries::delete(&mut tx, share_id).await?;
    db::fund_queries::set_share_ledger_values(&mut tx, fund.id, &initial, &current, &total).await?;

    tx.commit().await?;

    info!(
        "Redeemed {} shares of fund {} from investor {}",
        share.shares_count, fund.id, share.investor_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use chrono::NaiveDate;

    fn fund(initial: i64, current: i64, shares: i64) -> Fund {
        Fund {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            description: None,
            creation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            currency: "TRY".to_string(),
            management_fee: BigDecimal::from(0),
            risk_level: RiskLevel::Medium,
            target_return: None,
            is_active: true,
            initial_value: BigDecimal::from(initial),
            current_value: BigDecimal::from(current),
            total_shares: BigDecimal::from(shares),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn share(fund_id: Uuid, count: i64, investment: i64) -> FundShare {
        FundShare {
            id: Uuid::new_v4(),
            fund_id,
            investor_id: Uuid::new_v4(),
            shares_count: BigDecimal::from(count),
            initial_investment: BigDecimal::from(investment),
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            notes: None,
            last_updated: chrono::Utc::now(),
        }
    }

    #[test]
    fn first_investment_seeds_share_value_at_one() {
        // 1000 into an empty fund -> 1000 shares
        let shares = compute_shares(
            &BigDecimal::from(1000),
            &BigDecimal::from(0),
            &BigDecimal::from(0),
        );
        assert_eq!(shares, BigDecimal::from(1000));
    }

    #[test]
    fn investment_buys_at_prevailing_share_value() {
        // fund at 2000 over 1000 shares -> share value 2; 500 buys 250
        let shares = compute_shares(
            &BigDecimal::from(500),
            &BigDecimal::from(2000),
            &BigDecimal::from(1000),
        );
        assert_eq!(shares, BigDecimal::from(250));
    }

    #[test]
    fn non_positive_investment_buys_nothing() {
        let shares = compute_shares(
            &BigDecimal::from(0),
            &BigDecimal::from(2000),
            &BigDecimal::from(1000),
        );
        assert_eq!(shares, BigDecimal::from(0));
    }

    #[test]
    fn redemption_reduces_fund_by_current_worth() {
        let f = fund(1000, 3000, 1000); // share value 3
        let s = share(f.id, 200, 200);  // invested 200, now worth 600
        let (initial, current, total) = apply_redemption(&f, &s);
        assert_eq!(initial, BigDecimal::from(800));
        assert_eq!(current, BigDecimal::from(2400));
        assert_eq!(total, BigDecimal::from(800));
    }

    #[test]
    fn redemption_clamps_at_zero() {
        let f = fund(100, 100, 100);
        let s = share(f.id, 500, 500); // inconsistent ledger, still never negative
        let (initial, current, total) = apply_redemption(&f, &s);
        assert_eq!(initial, BigDecimal::from(0));
        assert_eq!(current, BigDecimal::from(0));
        assert_eq!(total, BigDecimal::from(0));
    }

    #[test]
    fn share_worth_tracks_fund_value() {
        let f = fund(1000, 4000, 1000); // share value 4
        let s = share(f.id, 250, 1000);
        let v = value_share(&f, &s);
        assert_eq!(v.current_value, BigDecimal::from(1000));
        assert_eq!(v.profit_loss, BigDecimal::from(0));
    }

    #[test]
    fn share_in_empty_fund_is_worthless() {
        let f = fund(0, 0, 0);
        let s = share(f.id, 0, 100);
        let v = value_share(&f, &s);
        assert_eq!(v.current_value, BigDecimal::from(0));
        assert_eq!(v.profit_loss, BigDecimal::from(-100));
    }
}
