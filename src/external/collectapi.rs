use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::external::market_provider::{
    MarketProvider, MarketProviderError, MarketQuote, QuoteBatch,
};

const BASE_URL: &str = "https://api.collectapi.com/economy";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// CollectAPI stock feed client. One authenticated GET returns the whole
/// market; the request carries a hard timeout and is never retried in-run.
pub struct CollectApiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl CollectApiProvider {
    pub fn new(api_key: String) -> Result<Self, MarketProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| MarketProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, MarketProviderError> {
        let api_key = std::env::var("COLLECT_API_KEY")
            .map_err(|_| MarketProviderError::BadResponse("COLLECT_API_KEY not set".into()))?;
        Self::new(api_key)
    }
}

#[derive(Debug, Deserialize)]
struct CollectApiResponse {
    success: bool,
    result: Option<Vec<CollectApiQuote>>,
}

#[derive(Debug, Deserialize)]
struct CollectApiQuote {
    code: Option<String>,
    text: Option<String>,
    icon: Option<String>,
    lastprice: Option<f64>,
    rate: Option<f64>,
    hacim: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    time: Option<String>,
}

fn decimal(value: f64) -> Result<BigDecimal, String> {
    value
        .to_string()
        .parse::<BigDecimal>()
        .map_err(|e| format!("bad decimal {}: {}", value, e))
}

fn opt_decimal(value: Option<f64>) -> Result<Option<BigDecimal>, String> {
    value.map(decimal).transpose()
}

/// Map one raw feed entry to a quote. Entries missing code, name, price or
/// change are malformed.
fn parse_quote(raw: CollectApiQuote) -> Result<MarketQuote, String> {
    let code = raw.code.filter(|c| !c.is_empty()).ok_or("missing code")?;
    let name = raw.text.filter(|t| !t.is_empty()).ok_or("missing name")?;
    let price = decimal(raw.lastprice.ok_or("missing lastprice")?)?;
    let change_pct = decimal(raw.rate.ok_or("missing rate")?)?;

    Ok(MarketQuote {
        code,
        name,
        icon_url: raw.icon,
        price,
        change_pct,
        volume: opt_decimal(raw.hacim)?,
        min_price: opt_decimal(raw.min)?,
        max_price: opt_decimal(raw.max)?,
        exchange_time: raw.time.unwrap_or_default(),
    })
}

#[async_trait]
impl MarketProvider for CollectApiProvider {
    async fn fetch_quotes(&self) -> Result<QuoteBatch, MarketProviderError> {
        let url = format!("{}/hisseSenedi", self.base_url);

        let resp = self
            .client
            .get(&url)
            .header("content-type", "application/json")
            .header("authorization", format!("apikey {}", self.api_key))
            .send()
            .await
            .map_err(|e| MarketProviderError::Network(e.to_string()))?;

        if resp.status().as_u16() == 429 {
            return Err(MarketProviderError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(MarketProviderError::BadResponse(format!(
                "status {}",
                resp.status()
            )));
        }

        let body: CollectApiResponse = resp
            .json()
            .await
            .map_err(|e| MarketProviderError::Parse(e.to_string()))?;

        if !body.success {
            return Err(MarketProviderError::BadResponse(
                "API reported success = false".into(),
            ));
        }

        let items = body
            .result
            .ok_or_else(|| MarketProviderError::Parse("missing result field".into()))?;

        let mut batch = QuoteBatch::default();
        for item in items {
            match parse_quote(item) {
                Ok(quote) => batch.quotes.push(quote),
                Err(reason) => {
                    warn!("Skipping malformed quote: {}", reason);
                    batch.malformed += 1;
                }
            }
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_quote() {
        let raw: CollectApiQuote = serde_json::from_str(
            r#"{
                "code": "THYAO",
                "text": "Turk Hava Yollari",
                "icon": "https://example.com/thyao.png",
                "lastprice": 287.5,
                "rate": -1.25,
                "hacim": 1250000.0,
                "min": 284.0,
                "max": 291.0,
                "time": "18:10"
            }"#,
        )
        .unwrap();

        let quote = parse_quote(raw).unwrap();
        assert_eq!(quote.code, "THYAO");
        assert_eq!(quote.price, "287.5".parse::<BigDecimal>().unwrap());
        assert_eq!(quote.change_pct, "-1.25".parse::<BigDecimal>().unwrap());
        assert_eq!(quote.exchange_time, "18:10");
    }

    #[test]
    fn missing_price_is_malformed() {
        let raw: CollectApiQuote =
            serde_json::from_str(r#"{"code": "THYAO", "text": "THY", "rate": 1.0}"#).unwrap();
        assert!(parse_quote(raw).is_err());
    }

    #[test]
    fn missing_code_is_malformed() {
        let raw: CollectApiQuote =
            serde_json::from_str(r#"{"text": "THY", "lastprice": 10.0, "rate": 1.0}"#).unwrap();
        assert!(parse_quote(raw).is_err());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let raw: CollectApiQuote = serde_json::from_str(
            r#"{"code": "GARAN", "text": "Garanti", "lastprice": 95.1, "rate": 0.4}"#,
        )
        .unwrap();
        let quote = parse_quote(raw).unwrap();
        assert!(quote.volume.is_none());
        assert!(quote.min_price.is_none());
        assert_eq!(quote.exchange_time, "");
    }
}
