use std::collections::HashSet;

use bigdecimal::BigDecimal;
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::{InvestedSource, Position, Transaction, TransactionKind};
use crate::services::{position_ledger, valuation_service};

/// A leaf mutation that derived aggregates must react to. Services describe
/// what happened; the orchestrator decides what to recompute.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// A transaction row was inserted, updated or deleted.
    TransactionChanged {
        portfolio_id: Uuid,
        instrument_id: Uuid,
        investor_id: Option<Uuid>,
    },
    /// A portfolio's fund link moved; both sides lose or gain a contributor.
    PortfolioFundLinkChanged {
        old_fund_id: Option<Uuid>,
        new_fund_id: Option<Uuid>,
    },
    /// A fund's aggregate value must be recomputed from linked portfolios.
    FundValueStale { fund_id: Uuid },
    /// An investment row was inserted, updated or deleted.
    InvestmentChanged { investor_id: Uuid },
    /// Several investment rows went away at once; repeats are expected and
    /// deduplicated.
    InvestmentsBulkDeleted { investor_ids: Vec<Uuid> },
}

/// The ordered, deduplicated recompute plan for a batch of events.
///
/// Dependency edges are fixed: Transaction -> Position -> Fund, and
/// Investment -> Investor. Position replays run first, fund aggregations
/// second (fund targets discovered from replayed portfolios join the ones
/// named by events), investor rollups last. Every target appears at most
/// once regardless of how many events point at it.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Plan {
    pub pairs: Vec<(Uuid, Uuid)>,
    pub funds: Vec<Uuid>,
    pub investors: Vec<Uuid>,
}

impl Plan {
    pub(crate) fn from_events(events: &[ChangeEvent]) -> Self {
        let mut plan = Plan::default();
        let mut seen_pairs = HashSet::new();
        let mut seen_funds = HashSet::new();
        let mut seen_investors = HashSet::new();

        for event in events {
            match event {
                ChangeEvent::TransactionChanged {
                    portfolio_id,
                    instrument_id,
                    investor_id,
                } => {
                    if seen_pairs.insert((*portfolio_id, *instrument_id)) {
                        plan.pairs.push((*portfolio_id, *instrument_id));
                    }
                    if let Some(investor_id) = investor_id {
                        if seen_investors.insert(*investor_id) {
                            plan.investors.push(*investor_id);
                        }
                    }
                }
                ChangeEvent::PortfolioFundLinkChanged {
                    old_fund_id,
                    new_fund_id,
                } => {
                    for fund_id in [old_fund_id, new_fund_id].into_iter().flatten() {
                        if seen_funds.insert(*fund_id) {
                            plan.funds.push(*fund_id);
                        }
                    }
                }
                ChangeEvent::FundValueStale { fund_id } => {
                    if seen_funds.insert(*fund_id) {
                        plan.funds.push(*fund_id);
                    }
                }
                ChangeEvent::InvestmentChanged { investor_id } => {
                    if seen_investors.insert(*investor_id) {
                        plan.investors.push(*investor_id);
                    }
                }
                ChangeEvent::InvestmentsBulkDeleted { investor_ids } => {
                    for investor_id in investor_ids {
                        if seen_investors.insert(*investor_id) {
                            plan.investors.push(*investor_id);
                        }
                    }
                }
            }
        }

        plan
    }

    fn add_fund(&mut self, fund_id: Uuid) {
        if !self.funds.contains(&fund_id) {
            self.funds.push(fund_id);
        }
    }
}

/// Run the whole propagation chain for a batch of events on the caller's
/// transaction connection.
///
/// The caller performs the triggering write on the same connection and
/// commits after this returns, so either the write and every derived
/// recompute land together or none of them do. Any error aborts the chain.
pub async fn run(conn: &mut PgConnection, events: Vec<ChangeEvent>) -> Result<(), AppError> {
    let mut plan = Plan::from_events(&events);
    debug!(
        "Propagating {} event(s): {} pair(s), {} fund(s), {} investor(s)",
        events.len(),
        plan.pairs.len(),
        plan.funds.len(),
        plan.investors.len()
    );

    // 1. Position ledger replays; each replayed portfolio pulls its linked
    //    fund into the plan. The portfolio row is locked first: it is the
    //    serialization point for pairs whose position row does not exist
    //    yet.
    for (portfolio_id, instrument_id) in plan.pairs.clone() {
        let portfolio = db::portfolio_queries::fetch_one_for_update(conn, portfolio_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Portfolio not found".to_string()))?;

        replay_pair(conn, portfolio_id, instrument_id).await?;

        if let Some(fund_id) = portfolio.fund_id {
            plan.add_fund(fund_id);
        }
    }

    // 2. Fund aggregations, at most once per fund.
    for fund_id in plan.funds.clone() {
        update_fund_value(conn, fund_id).await?;
    }

    // 3. Investor rollups, at most once per investor, each through its
    //    configured source.
    for investor_id in plan.investors.clone() {
        recompute_investor(conn, investor_id).await?;
    }

    Ok(())
}

/// Replay one (portfolio, instrument) pair and persist the outcome. The pair
/// slot is locked first so concurrent writers serialize.
async fn replay_pair(
    conn: &mut PgConnection,
    portfolio_id: Uuid,
    instrument_id: Uuid,
) -> Result<(), AppError> {
    let existing =
        db::position_queries::fetch_by_pair_for_update(conn, portfolio_id, instrument_id).await?;

    let history =
        db::transaction_queries::fetch_pair_ordered(conn, portfolio_id, instrument_id).await?;

    match position_ledger::replay(&history) {
        None => {
            // no surviving transactions: the derived row goes away
            if existing.is_some() {
                db::position_queries::delete_by_pair(conn, portfolio_id, instrument_id).await?;
            }
        }
        Some(state) => {
            let position = Position {
                id: existing.map(|p| p.id).unwrap_or_else(Uuid::new_v4),
                portfolio_id,
                instrument_id,
                quantity: state.quantity,
                average_cost: state.average_cost,
                open_date: state.open_date,
                is_open: state.is_open,
            };
            db::position_queries::upsert(conn, &position).await?;
        }
    }

    Ok(())
}

/// Fund aggregation: current value becomes the sum of linked portfolios'
/// read-time values. Only current_value is written; the previous share value
/// is computed first for the audit log.
async fn update_fund_value(conn: &mut PgConnection, fund_id: Uuid) -> Result<(), AppError> {
    let fund = match db::fund_queries::fetch_one_for_update(conn, fund_id).await? {
        Some(fund) => fund,
        // fund vanished between the event and the recompute: a no-op
        None => return Ok(()),
    };

    let total = valuation_service::fund_portfolios_value(conn, fund_id).await?;

    if fund.total_shares > BigDecimal::from(0) {
        let previous_share_value = &fund.current_value / &fund.total_shares;
        let new_share_value = &total / &fund.total_shares;
        info!(
            "Fund {} value {} -> {} (share value {} -> {})",
            fund_id, fund.current_value, total, previous_share_value, new_share_value
        );
    }

    db::fund_queries::set_current_value(conn, fund_id, &total).await?;
    Ok(())
}

/// Investor rollup through the investor's configured source.
async fn recompute_investor(conn: &mut PgConnection, investor_id: Uuid) -> Result<(), AppError> {
    let investor = match db::investor_queries::fetch_one_for_update(conn, investor_id).await? {
        Some(investor) => investor,
        None => return Ok(()),
    };

    let total = total_invested_for(conn, investor_id, investor.invested_source).await?;
    db::investor_queries::set_total_invested(conn, investor_id, &total).await?;
    Ok(())
}

/// One of the two competing total_invested computations, chosen explicitly.
pub(crate) async fn total_invested_for(
    conn: &mut PgConnection,
    investor_id: Uuid,
    source: InvestedSource,
) -> Result<BigDecimal, AppError> {
    match source {
        InvestedSource::Transactions => {
            let transactions =
                db::transaction_queries::fetch_for_investor_portfolios(conn, investor_id).await?;
            Ok(total_invested_from_transactions(&transactions))
        }
        InvestedSource::Investments => {
            Ok(db::investment_queries::sum_for_investor(conn, investor_id).await?)
        }
    }
}

/// Fold the transactions-based contribution total: buys add price x qty plus
/// fees, sells subtract proceeds net of fees. Other kinds carry no cash flow
/// here.
pub(crate) fn total_invested_from_transactions(transactions: &[Transaction]) -> BigDecimal {
    let mut total = BigDecimal::from(0);
    for tx in transactions {
        match tx.kind {
            TransactionKind::Buy => total += tx.total_amount(),
            TransactionKind::Sell => total -= tx.total_amount(),
            _ => {}
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    #[test]
    fn plan_deduplicates_pairs() {
        let events = vec![
            ChangeEvent::TransactionChanged {
                portfolio_id: uuid(1),
                instrument_id: uuid(2),
                investor_id: None,
            },
            ChangeEvent::TransactionChanged {
                portfolio_id: uuid(1),
                instrument_id: uuid(2),
                investor_id: None,
            },
        ];
        let plan = Plan::from_events(&events);
        assert_eq!(plan.pairs, vec![(uuid(1), uuid(2))]);
    }

    #[test]
    fn bulk_investment_delete_rolls_up_each_investor_once() {
        let events = vec![ChangeEvent::InvestmentsBulkDeleted {
            investor_ids: vec![uuid(7), uuid(7), uuid(7), uuid(7), uuid(7)],
        }];
        let plan = Plan::from_events(&events);
        assert_eq!(plan.investors, vec![uuid(7)]);
    }

    #[test]
    fn fund_link_change_recomputes_both_sides() {
        let events = vec![ChangeEvent::PortfolioFundLinkChanged {
            old_fund_id: Some(uuid(3)),
            new_fund_id: Some(uuid(4)),
        }];
        let plan = Plan::from_events(&events);
        assert_eq!(plan.funds, vec![uuid(3), uuid(4)]);
    }

    #[test]
    fn unchanged_link_side_recomputes_once() {
        let events = vec![ChangeEvent::PortfolioFundLinkChanged {
            old_fund_id: Some(uuid(3)),
            new_fund_id: Some(uuid(3)),
        }];
        let plan = Plan::from_events(&events);
        assert_eq!(plan.funds, vec![uuid(3)]);
    }

    #[test]
    fn transaction_event_carries_investor_rollup() {
        let events = vec![ChangeEvent::TransactionChanged {
            portfolio_id: uuid(1),
            instrument_id: uuid(2),
            investor_id: Some(uuid(9)),
        }];
        let plan = Plan::from_events(&events);
        assert_eq!(plan.investors, vec![uuid(9)]);
    }

    fn cash_tx(kind: TransactionKind, price: i64, qty: i64, fee: i64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            portfolio_id: Uuid::nil(),
            instrument_id: Uuid::nil(),
            investor_id: None,
            kind,
            date: Utc::now(),
            price: BigDecimal::from(price),
            quantity: BigDecimal::from(qty),
            commission: BigDecimal::from(fee),
            tax: BigDecimal::from(0),
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn transactions_rollup_adds_buys_and_subtracts_sells() {
        let txs = vec![
            cash_tx(TransactionKind::Buy, 10, 100, 5),     // +1005
            cash_tx(TransactionKind::Sell, 12, 50, 5),     // -595
            cash_tx(TransactionKind::Dividend, 3, 100, 0), // ignored
        ];
        assert_eq!(
            total_invested_from_transactions(&txs),
            BigDecimal::from(410)
        );
    }
}
