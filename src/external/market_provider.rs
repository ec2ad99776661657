use async_trait::async_trait;
use bigdecimal::BigDecimal;
use thiserror::Error;

/// One parsed quote from the market feed.
#[derive(Debug, Clone)]
pub struct MarketQuote {
    pub code: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub price: BigDecimal,
    pub change_pct: BigDecimal,
    pub volume: Option<BigDecimal>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    /// Exchange-reported time label (e.g. "18:10"), kept verbatim for
    /// duplicate suppression.
    pub exchange_time: String,
}

/// A batch fetch result. Malformed feed entries are counted, not silently
/// dropped, so ingestion can report them as per-instrument failures.
#[derive(Debug, Default)]
pub struct QuoteBatch {
    pub quotes: Vec<MarketQuote>,
    pub malformed: usize,
}

#[derive(Debug, Error)]
pub enum MarketProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait MarketProvider: Send + Sync {
    /// Fetch the full market snapshot in one call. Network failures, non-200
    /// responses and unparsable payloads are distinct errors, never an empty
    /// batch.
    async fn fetch_quotes(&self) -> Result<QuoteBatch, MarketProviderError>;
}
