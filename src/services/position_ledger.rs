use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::models::{Transaction, TransactionKind};

/// Result of replaying one (portfolio, instrument) transaction history.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    pub quantity: BigDecimal,
    pub average_cost: BigDecimal,
    pub is_open: bool,
    pub open_date: NaiveDate,
}

/// Replay the complete, ordered transaction history for one
/// (portfolio, instrument) pair.
///
/// Always a full replay rather than an incremental step: deletes and edits
/// anywhere in the history produce the same result as if the surviving rows
/// had been entered in order. Replaying the same input twice yields the same
/// state.
///
/// Rules:
/// - buy: accumulates running cost and recomputes the weighted average;
/// - sell: reduces quantity, clamped at zero; at zero the position closes,
///   running cost resets, and the last average cost is retained for display;
/// - split/merger: the price field carries the ratio (quantity scaled up and
///   average cost down for splits, the inverse for mergers);
/// - dividend/rights: no quantity or cost effect.
///
/// A sell beyond current holdings clamps instead of failing; rejecting such
/// input is the transaction service's job, before it ever lands here.
///
/// Returns None for an empty history: the position row should not exist.
pub fn replay(history: &[Transaction]) -> Option<LedgerState> {
    let first = history.first()?;

    let zero = BigDecimal::from(0);
    let mut quantity = zero.clone();
    let mut average_cost = zero.clone();
    let mut running_cost = zero.clone();
    let mut is_open = false;
    let open_date = first.date.date_naive();

    for tx in history {
        match tx.kind {
            TransactionKind::Buy => {
                running_cost += &tx.quantity * &tx.price;
                quantity += &tx.quantity;
                if quantity > zero {
                    average_cost = &running_cost / &quantity;
                    is_open = true;
                }
            }
            TransactionKind::Sell => {
                quantity -= &tx.quantity;
                if quantity <= zero {
                    quantity = zero.clone();
                    running_cost = zero.clone();
                    is_open = false;
                }
            }
            TransactionKind::Split => {
                // price carries the split ratio
                if tx.price > zero {
                    quantity = &quantity * &tx.price;
                    average_cost = &average_cost / &tx.price;
                }
            }
            TransactionKind::Merger => {
                if tx.price > zero {
                    quantity = &quantity / &tx.price;
                    average_cost = &average_cost * &tx.price;
                }
            }
            TransactionKind::Dividend | TransactionKind::Rights => {}
        }
    }

    Some(LedgerState {
        quantity,
        average_cost,
        is_open,
        open_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn tx(kind: TransactionKind, day: u32, price: i64, quantity: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            portfolio_id: Uuid::nil(),
            instrument_id: Uuid::nil(),
            investor_id: None,
            kind,
            date: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            price: BigDecimal::from(price),
            quantity: BigDecimal::from(quantity),
            commission: BigDecimal::from(0),
            tax: BigDecimal::from(0),
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_history_has_no_state() {
        assert!(replay(&[]).is_none());
    }

    #[test]
    fn single_buy_sets_quantity_and_cost() {
        let state = replay(&[tx(TransactionKind::Buy, 1, 10, 100)]).unwrap();
        assert_eq!(state.quantity, BigDecimal::from(100));
        assert_eq!(state.average_cost, BigDecimal::from(10));
        assert!(state.is_open);
        assert_eq!(state.open_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn buys_average_weighted_by_quantity() {
        // 100 @ 10 + 100 @ 20 -> 200 @ 15
        let state = replay(&[
            tx(TransactionKind::Buy, 1, 10, 100),
            tx(TransactionKind::Buy, 2, 20, 100),
        ])
        .unwrap();
        assert_eq!(state.quantity, BigDecimal::from(200));
        assert_eq!(state.average_cost, BigDecimal::from(15));
    }

    #[test]
    fn replay_is_idempotent() {
        let history = vec![
            tx(TransactionKind::Buy, 1, 10, 100),
            tx(TransactionKind::Sell, 2, 12, 40),
            tx(TransactionKind::Buy, 3, 8, 50),
        ];
        let a = replay(&history).unwrap();
        let b = replay(&history).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn equal_date_buys_replay_the_same_in_either_order() {
        let first = tx(TransactionKind::Buy, 5, 10, 100);
        let second = tx(TransactionKind::Buy, 5, 20, 50);
        let ab = replay(&[first.clone(), second.clone()]).unwrap();
        let ba = replay(&[second, first]).unwrap();
        assert_eq!(ab.quantity, ba.quantity);
        assert_eq!(ab.average_cost, ba.average_cost);
    }

    #[test]
    fn full_sell_closes_position() {
        let state = replay(&[
            tx(TransactionKind::Buy, 1, 10, 100),
            tx(TransactionKind::Sell, 2, 14, 100),
        ])
        .unwrap();
        assert_eq!(state.quantity, BigDecimal::from(0));
        assert!(!state.is_open);
        // average cost kept for historical display
        assert_eq!(state.average_cost, BigDecimal::from(10));
    }

    #[test]
    fn oversell_clamps_to_zero() {
        let state = replay(&[
            tx(TransactionKind::Buy, 1, 10, 50),
            tx(TransactionKind::Sell, 2, 10, 80),
        ])
        .unwrap();
        assert_eq!(state.quantity, BigDecimal::from(0));
        assert!(!state.is_open);
    }

    #[test]
    fn buy_after_close_restarts_cost_basis() {
        let state = replay(&[
            tx(TransactionKind::Buy, 1, 10, 100),
            tx(TransactionKind::Sell, 2, 12, 100),
            tx(TransactionKind::Buy, 3, 20, 50),
        ])
        .unwrap();
        assert_eq!(state.quantity, BigDecimal::from(50));
        assert_eq!(state.average_cost, BigDecimal::from(20));
        assert!(state.is_open);
    }

    #[test]
    fn split_scales_quantity_up_and_cost_down() {
        let state = replay(&[
            tx(TransactionKind::Buy, 1, 20, 100),
            tx(TransactionKind::Split, 2, 2, 0),
        ])
        .unwrap();
        assert_eq!(state.quantity, BigDecimal::from(200));
        assert_eq!(state.average_cost, BigDecimal::from(10));
    }

    #[test]
    fn merger_scales_quantity_down_and_cost_up() {
        let state = replay(&[
            tx(TransactionKind::Buy, 1, 10, 100),
            tx(TransactionKind::Merger, 2, 4, 0),
        ])
        .unwrap();
        assert_eq!(state.quantity, BigDecimal::from(25));
        assert_eq!(state.average_cost, BigDecimal::from(40));
    }

    #[test]
    fn dividend_and_rights_leave_position_untouched() {
        let base = replay(&[tx(TransactionKind::Buy, 1, 10, 100)]).unwrap();
        let with_extras = replay(&[
            tx(TransactionKind::Buy, 1, 10, 100),
            tx(TransactionKind::Dividend, 2, 3, 100),
            tx(TransactionKind::Rights, 3, 1, 10),
        ])
        .unwrap();
        assert_eq!(base.quantity, with_extras.quantity);
        assert_eq!(base.average_cost, with_extras.average_cost);
    }

    #[test]
    fn cost_of_buys_only_history_matches_sum_of_amounts() {
        // no sells: quantity x average cost == sum of price x qty over buys
        let history = vec![
            tx(TransactionKind::Buy, 1, 10, 100),
            tx(TransactionKind::Buy, 2, 30, 50),
            tx(TransactionKind::Buy, 3, 14, 25),
        ];
        let state = replay(&history).unwrap();
        let expected: BigDecimal = history.iter().map(|t| &t.price * &t.quantity).sum();
        assert_eq!(&state.quantity * &state.average_cost, expected);
    }
}
