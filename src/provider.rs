//! Wallet portfolio provider
//!
//! One [`PortfolioProvider`] replaces the per-chain copies of the
//! cache/retry/valuation pattern: the chain-specific pieces (price-source
//! asset id, native symbol, balance lookup) are constructor parameters, and
//! the cache key namespace, TTL, and retry policy come from configuration.
//! Construct one per process and share it by reference; there is no global
//! instance.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use agent_portfolio_core::prelude::*;
//! # struct RpcBalances;
//! # #[async_trait::async_trait]
//! # impl BalanceSource for RpcBalances {
//! #     async fn fetch_balance(&self, _address: &str) -> Result<rust_decimal::Decimal> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ProviderConfig::default().with_ttl_seconds(300);
//!     let provider = PortfolioProvider::new(
//!         &config,
//!         "solana",
//!         "SOL",
//!         Arc::new(RpcBalances),
//!     )?;
//!
//!     let report = provider
//!         .report("Agent-X", "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM")
//!         .await;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use crate::cache::TieredQuoteCache;
use crate::config::ProviderConfig;
use crate::error::Result;
use crate::portfolio::{format_portfolio, valuate};
use crate::retry::{with_retry, RetryPolicy};
use crate::source::{HttpPriceSource, PriceSource};
use crate::store::{FileStore, QuoteStore};
use crate::types::{CacheStats, PortfolioSnapshot, PriceQuote};

/// Fallback returned by [`PortfolioProvider::report`] when every tier and
/// retry has failed
pub const FALLBACK_REPORT: &str = "Unable to fetch wallet information. Please try again later.";

/// Source of native-token balances for wallet addresses
///
/// Real deployments back this with the chain's RPC client; tests use fixed
/// values. Balances are whole native units (not base units), so a 9-decimal
/// chain reports `1.5`, not `1500000000`.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Current native balance for an address
    async fn fetch_balance(&self, address: &str) -> Result<Decimal>;
}

/// Cached, retrying wallet portfolio provider for one chain integration
pub struct PortfolioProvider {
    cache: TieredQuoteCache,
    price_source: Arc<dyn PriceSource>,
    balance_source: Arc<dyn BalanceSource>,
    policy: RetryPolicy,
    ttl: std::time::Duration,
    asset: String,
    native_symbol: String,
}

impl PortfolioProvider {
    /// Create a provider with the production wiring: file-backed store and
    /// HTTP price source, both from configuration
    pub fn new(
        config: &ProviderConfig,
        asset: impl Into<String>,
        native_symbol: impl Into<String>,
        balance_source: Arc<dyn BalanceSource>,
    ) -> Result<Self> {
        let store = Arc::new(FileStore::new(&config.store.path)?);
        let price_source = Arc::new(HttpPriceSource::new(&config.source)?);
        Ok(Self::with_components(
            config,
            asset,
            native_symbol,
            price_source,
            balance_source,
            store,
        ))
    }

    /// Create a provider from explicit components
    pub fn with_components(
        config: &ProviderConfig,
        asset: impl Into<String>,
        native_symbol: impl Into<String>,
        price_source: Arc<dyn PriceSource>,
        balance_source: Arc<dyn BalanceSource>,
        store: Arc<dyn QuoteStore>,
    ) -> Self {
        Self {
            cache: TieredQuoteCache::new(store),
            price_source,
            balance_source,
            policy: RetryPolicy::from_settings(&config.retry),
            ttl: config.ttl(),
            asset: asset.into(),
            native_symbol: native_symbol.into(),
        }
    }

    /// Current unit price for this provider's asset, cached under
    /// `price-<asset>` and shared with portfolio lookups
    #[instrument(skip(self), fields(asset = %self.asset))]
    pub async fn fetch_price(&self) -> Result<PriceQuote> {
        let key = format!("price-{}", self.asset);
        let policy = self.policy;
        let source = self.price_source.clone();
        let asset = self.asset.clone();
        self.cache
            .get_or_fetch(&key, self.ttl, move || async move {
                with_retry(&policy, || {
                    let source = source.clone();
                    let asset = asset.clone();
                    async move { source.fetch_price(&asset).await }
                })
                .await
            })
            .await
    }

    /// Point-in-time valuation of a wallet, cached under
    /// `portfolio-<address>`
    ///
    /// On a cold path the balance is fetched with retry and priced via
    /// [`fetch_price`](Self::fetch_price), so a warm price quote is reused
    /// across portfolio lookups for different addresses.
    #[instrument(skip(self))]
    pub async fn fetch_portfolio(&self, address: &str) -> Result<PortfolioSnapshot> {
        let key = format!("portfolio-{}", address);
        self.cache
            .get_or_fetch(&key, self.ttl, move || async move {
                let balance = with_retry(&self.policy, || {
                    let source = self.balance_source.clone();
                    let address = address.to_string();
                    async move { source.fetch_balance(&address).await }
                })
                .await?;

                let quote = self.fetch_price().await?;
                let snapshot = valuate(balance, quote.price);
                info!(
                    address,
                    native = %snapshot.total_native_units,
                    value = %snapshot.total_quote_value,
                    currency = %quote.currency,
                    "valuated portfolio"
                );
                Ok(snapshot)
            })
            .await
    }

    /// The action-handler boundary: the formatted three-line wallet report,
    /// or [`FALLBACK_REPORT`] if the portfolio cannot be fetched
    ///
    /// This is the one place an error is swallowed; it is logged first.
    pub async fn report(&self, identity_label: &str, address: &str) -> String {
        match self.fetch_portfolio(address).await {
            Ok(snapshot) => {
                format_portfolio(&snapshot, identity_label, address, &self.native_symbol)
            }
            Err(err) => {
                error!(error = %err, address, "failed to build portfolio report");
                FALLBACK_REPORT.to_string()
            }
        }
    }

    /// Cache hit/miss counters for this provider
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
