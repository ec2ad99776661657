use std::collections::HashMap;

use bigdecimal::BigDecimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{PortfolioValuation, Position, PositionValuation, PriceSnapshot};

// Read-time portfolio aggregation. Nothing here is persisted: every call
// recomputes from current positions and the latest snapshot per instrument.

/// Value one position against its latest price. A position with no price
/// history yet values at zero, not at cost.
pub fn value_position(
    position: &Position,
    instrument_code: &str,
    latest: Option<&PriceSnapshot>,
) -> PositionValuation {
    let zero = BigDecimal::from(0);
    let current_price = latest.map(|p| p.price.clone()).unwrap_or_else(|| zero.clone());
    let total_cost = position.total_cost();
    let current_value = &position.quantity * &current_price;
    let profit_loss = &current_value - &total_cost;
    let profit_loss_pct = if total_cost == zero {
        zero
    } else {
        &profit_loss / &total_cost * BigDecimal::from(100)
    };

    PositionValuation {
        position_id: position.id,
        instrument_id: position.instrument_id,
        instrument_code: instrument_code.to_string(),
        quantity: position.quantity.clone(),
        average_cost: position.average_cost.clone(),
        total_cost,
        current_price,
        current_value,
        profit_loss,
        profit_loss_pct,
        is_open: position.is_open,
        open_date: position.open_date,
    }
}

/// Fold position valuations into the portfolio totals. Profit/loss percent
/// is defined as zero for an all-zero cost basis.
pub fn fold_portfolio(portfolio_id: Uuid, positions: Vec<PositionValuation>) -> PortfolioValuation {
    let zero = BigDecimal::from(0);
    let mut total_current_value = zero.clone();
    let mut total_cost = zero.clone();

    for p in &positions {
        total_current_value += &p.current_value;
        total_cost += &p.total_cost;
    }

    let profit_loss = &total_current_value - &total_cost;
    let profit_loss_pct = if total_cost == zero {
        zero
    } else {
        &profit_loss / &total_cost * BigDecimal::from(100)
    };

    PortfolioValuation {
        portfolio_id,
        total_current_value,
        total_cost,
        profit_loss,
        profit_loss_pct,
        positions,
    }
}

/// Full valuation of one portfolio on a caller-provided connection, so the
/// fund aggregator can run it inside its propagation transaction.
pub(crate) async fn portfolio_valuation_conn(
    conn: &mut PgConnection,
    portfolio_id: Uuid,
) -> Result<PortfolioValuation, AppError> {
    let positions = db::position_queries::fetch_all_conn(conn, portfolio_id).await?;

    let instrument_ids: Vec<Uuid> = positions.iter().map(|p| p.instrument_id).collect();
    let latest = db::price_queries::fetch_latest_batch(conn, &instrument_ids).await?;
    let codes = db::instrument_queries::fetch_code_map(conn, &instrument_ids).await?;

    let valuations = positions
        .iter()
        .map(|p| {
            let code = codes.get(&p.instrument_id).map(String::as_str).unwrap_or("");
            value_position(p, code, latest.get(&p.instrument_id))
        })
        .collect();

    Ok(fold_portfolio(portfolio_id, valuations))
}

pub async fn portfolio_valuation(
    pool: &PgPool,
    portfolio_id: Uuid,
) -> Result<PortfolioValuation, AppError> {
    let portfolio = db::portfolio_queries::fetch_one(pool, portfolio_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;

    let mut conn = pool.acquire().await?;
    portfolio_valuation_conn(&mut conn, portfolio.id).await
}

/// Sum of linked portfolios' current values: the fund aggregator's input.
pub(crate) async fn fund_portfolios_value(
    conn: &mut PgConnection,
    fund_id: Uuid,
) -> Result<BigDecimal, AppError> {
    let portfolio_ids = db::portfolio_queries::fetch_ids_for_fund(conn, fund_id).await?;

    let mut valuations = Vec::with_capacity(portfolio_ids.len());
    for id in portfolio_ids {
        valuations.push(portfolio_valuation_conn(conn, id).await?);
    }
    Ok(sum_portfolio_values(&valuations))
}

pub(crate) fn sum_portfolio_values(valuations: &[PortfolioValuation]) -> BigDecimal {
    let mut total = BigDecimal::from(0);
    for v in valuations {
        total += &v.total_current_value;
    }
    total
}

/// In-memory variant of the "latest snapshot wins" rule: newest ingestion
/// timestamp, ties broken by highest row id.
#[allow(dead_code)]
pub fn latest_prices_by_instrument(
    snapshots: Vec<PriceSnapshot>,
) -> HashMap<Uuid, PriceSnapshot> {
    let mut map: HashMap<Uuid, PriceSnapshot> = HashMap::new();
    for snap in snapshots {
        let keep = match map.get(&snap.instrument_id) {
            Some(existing) => (snap.ingested_at, snap.id) > (existing.ingested_at, existing.id),
            None => true,
        };
        if keep {
            map.insert(snap.instrument_id, snap);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn position(quantity: i64, average_cost: i64) -> Position {
        Position {
            id: Uuid::new_v4(),
            portfolio_id: Uuid::nil(),
            instrument_id: Uuid::new_v4(),
            quantity: BigDecimal::from(quantity),
            average_cost: BigDecimal::from(average_cost),
            open_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            is_open: true,
        }
    }

    fn snapshot(instrument_id: Uuid, id: i64, price: i64, minute: u32) -> PriceSnapshot {
        PriceSnapshot {
            id,
            instrument_id,
            price: BigDecimal::from(price),
            change_pct: BigDecimal::from(0),
            volume: None,
            min_price: None,
            max_price: None,
            exchange_time: "18:10".to_string(),
            ingested_at: Utc.with_ymd_and_hms(2024, 1, 2, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn position_values_against_latest_price() {
        let p = position(100, 10);
        let snap = snapshot(p.instrument_id, 1, 12, 0);
        let v = value_position(&p, "ABC", Some(&snap));
        assert_eq!(v.current_value, BigDecimal::from(1200));
        assert_eq!(v.total_cost, BigDecimal::from(1000));
        assert_eq!(v.profit_loss, BigDecimal::from(200));
        assert_eq!(v.profit_loss_pct, BigDecimal::from(20));
    }

    #[test]
    fn position_without_prices_values_at_zero() {
        let p = position(100, 10);
        let v = value_position(&p, "ABC", None);
        assert_eq!(v.current_value, BigDecimal::from(0));
        assert_eq!(v.profit_loss, BigDecimal::from(-1000));
    }

    #[test]
    fn portfolio_fold_sums_positions() {
        let a = position(100, 10);
        let b = position(50, 20);
        let va = value_position(&a, "A", Some(&snapshot(a.instrument_id, 1, 12, 0)));
        let vb = value_position(&b, "B", Some(&snapshot(b.instrument_id, 2, 30, 0)));
        let folded = fold_portfolio(Uuid::nil(), vec![va, vb]);
        assert_eq!(folded.total_current_value, BigDecimal::from(2700));
        assert_eq!(folded.total_cost, BigDecimal::from(2000));
        assert_eq!(folded.profit_loss, BigDecimal::from(700));
        assert_eq!(folded.profit_loss_pct, BigDecimal::from(35));
    }

    #[test]
    fn empty_portfolio_has_zero_percent() {
        let folded = fold_portfolio(Uuid::nil(), vec![]);
        assert_eq!(folded.profit_loss_pct, BigDecimal::from(0));
    }

    #[test]
    fn fund_value_is_sum_of_linked_portfolio_values() {
        // two portfolios at 1000 and 1500 aggregate to 2500
        let a = position(100, 10);
        let b = position(100, 10);
        let pa = fold_portfolio(
            Uuid::new_v4(),
            vec![value_position(&a, "A", Some(&snapshot(a.instrument_id, 1, 10, 0)))],
        );
        let pb = fold_portfolio(
            Uuid::new_v4(),
            vec![value_position(&b, "B", Some(&snapshot(b.instrument_id, 2, 15, 0)))],
        );
        assert_eq!(pa.total_current_value, BigDecimal::from(1000));
        assert_eq!(pb.total_current_value, BigDecimal::from(1500));
        assert_eq!(sum_portfolio_values(&[pa, pb]), BigDecimal::from(2500));
    }

    #[test]
    fn latest_price_prefers_newest_then_highest_id() {
        let instrument = Uuid::new_v4();
        // same ingestion minute: higher id wins
        let older = snapshot(instrument, 1, 10, 5);
        let newer_same_time = snapshot(instrument, 2, 11, 5);
        let map = latest_prices_by_instrument(vec![older, newer_same_time]);
        assert_eq!(map[&instrument].price, BigDecimal::from(11));
    }
}
