//! Price sources
//!
//! A [`PriceSource`] produces fresh unit prices for the cache to hold.
//! [`HttpPriceSource`] is the reference implementation against a
//! CoinGecko-style JSON endpoint:
//!
//! ```text
//! GET {base_url}/simple/price?ids={asset}&vs_currencies={currency}
//! => { "solana": { "usd": 142.35 } }
//! ```
//!
//! The HTTP client timeout is the only bound on a hanging request; the
//! retry layer above imposes none of its own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::SourceSettings;
use crate::error::{Error, Result};
use crate::types::PriceQuote;

/// Source of fresh unit prices
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current unit price for an asset
    async fn fetch_price(&self, asset: &str) -> Result<PriceQuote>;
}

/// HTTP JSON price API client
pub struct HttpPriceSource {
    client: reqwest::Client,
    base_url: String,
    currency: String,
}

impl HttpPriceSource {
    /// Create a source from settings
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            currency: settings.currency.clone(),
        })
    }

    /// Request URL for an asset
    fn price_url(&self, asset: &str) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url, asset, self.currency
        )
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    #[instrument(skip(self))]
    async fn fetch_price(&self, asset: &str) -> Result<PriceQuote> {
        let url = self.price_url(asset);
        debug!(url, "requesting price");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(format!("price request for {} timed out", asset))
            } else {
                Error::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::rate_limited(format!(
                "price API rate limited request for {}",
                asset
            )));
        }
        if !status.is_success() {
            return Err(Error::fetch(format!(
                "price API returned {} for {}",
                status, asset
            )));
        }

        let body: Value = response.json().await?;
        let price = parse_price_response(&body, asset, &self.currency)?;

        Ok(PriceQuote::new(asset, price, &self.currency, &self.base_url))
    }
}

/// Extract and validate the unit price from a response body
///
/// Accepts both JSON numbers and decimal strings; rejects missing fields and
/// non-positive prices.
fn parse_price_response(body: &Value, asset: &str, currency: &str) -> Result<Decimal> {
    let raw = body
        .get(asset)
        .and_then(|prices| prices.get(currency))
        .ok_or_else(|| {
            Error::invalid_quote(format!("no {} price for {} in response", currency, asset))
        })?;

    let price: Decimal = serde_json::from_value(raw.clone())
        .map_err(|e| Error::invalid_quote(format!("unparseable price for {}: {}", asset, e)))?;

    if price <= Decimal::ZERO {
        return Err(Error::invalid_quote(format!(
            "non-positive price {} for {}",
            price, asset
        )));
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_price_url() {
        let settings = SourceSettings {
            base_url: "https://api.coingecko.com/api/v3/".to_string(),
            currency: "usd".to_string(),
            timeout_seconds: 30,
        };
        let source = HttpPriceSource::new(&settings).unwrap();

        assert_eq!(
            source.price_url("solana"),
            "https://api.coingecko.com/api/v3/simple/price?ids=solana&vs_currencies=usd"
        );
    }

    #[test]
    fn test_parse_numeric_price() {
        let body = json!({ "solana": { "usd": 142.35 } });
        let price = parse_price_response(&body, "solana", "usd").unwrap();
        assert_eq!(price, dec!(142.35));
    }

    #[test]
    fn test_parse_string_price() {
        let body = json!({ "the-open-network": { "usd": "5.4321" } });
        let price = parse_price_response(&body, "the-open-network", "usd").unwrap();
        assert_eq!(price, dec!(5.4321));
    }

    #[test]
    fn test_parse_missing_asset() {
        let body = json!({ "solana": { "usd": 142.35 } });
        let err = parse_price_response(&body, "aptos", "usd").unwrap_err();
        assert!(matches!(err, Error::InvalidQuote(_)));
    }

    #[test]
    fn test_parse_missing_currency() {
        let body = json!({ "solana": { "usd": 142.35 } });
        let err = parse_price_response(&body, "solana", "eur").unwrap_err();
        assert!(matches!(err, Error::InvalidQuote(_)));
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        let body = json!({ "solana": { "usd": 0 } });
        let err = parse_price_response(&body, "solana", "usd").unwrap_err();
        assert!(matches!(err, Error::InvalidQuote(_)));
        assert!(!err.is_recoverable());
    }
}
