mod fund;
mod fund_share;
mod instrument;
mod investment;
mod investor;
mod portfolio;
mod portfolio_snapshot;
mod position;
mod price_snapshot;
mod transaction;
mod valuation;
mod watchlist;

pub use fund::{CreateFund, Fund, UpdateFund};
pub use fund_share::{CreateFundShare, FundShare, UpdateFundShare};
pub use instrument::{CreateInstrument, Instrument};
pub use investment::{BulkDeleteInvestments, CreateInvestment, Investment, InvestmentKind, UpdateInvestment};
pub use investor::{CreateInvestor, InvestedSource, Investor, UpdateInvestor};
pub use portfolio::{CreatePortfolio, Portfolio, RiskLevel, UpdatePortfolio};
pub use portfolio_snapshot::PortfolioSnapshot;
pub use position::Position;
pub use price_snapshot::{NewPriceSnapshot, PriceSnapshot};
pub use transaction::{CreateTransaction, Transaction, TransactionKind, UpdateTransaction};
pub use valuation::{
    FundShareValuation, FundValuation, InvestorSummary, PortfolioValuation, PositionValuation,
};
pub use watchlist::{
    CreateWatchList, CreateWatchListItem, UpdateWatchList, WatchList, WatchListItem,
};
