//! Agent Portfolio Core Library
//!
//! This library provides the caching, retry, and valuation core shared by
//! wallet portfolio providers for AI agents. It lets an agent answer "what
//! is this wallet worth" without hammering upstream price APIs: values are
//! held in a two-tier (in-memory + persistent) TTL cache, fetched with
//! exponential-backoff retry, and valuated in arbitrary-precision decimal
//! arithmetic.
//!
//! # Features
//!
//! - **Two-Tier TTL Cache**: in-memory fast path, persistent store that
//!   survives restarts, promotion between tiers
//! - **Resilient Fetching**: bounded retries with exponential backoff for
//!   transient upstream failures
//! - **Exact Valuation**: `rust_decimal` arithmetic, rounding only at the
//!   presentation boundary
//! - **Pluggable Backends**: bring your own [`QuoteStore`], [`PriceSource`],
//!   and [`BalanceSource`]
//! - **Per-Chain Parametrization**: one provider type covers every chain
//!   integration via constructor parameters
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use agent_portfolio_core::prelude::*;
//! use rust_decimal::Decimal;
//!
//! struct RpcBalances;
//!
//! #[async_trait::async_trait]
//! impl BalanceSource for RpcBalances {
//!     async fn fetch_balance(&self, address: &str) -> Result<Decimal> {
//!         // Query the chain's RPC for the address's native balance.
//!         # let _ = address;
//!         Ok(Decimal::new(25, 1))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ProviderConfig::default()
//!         .with_ttl_seconds(300)
//!         .with_store_path("./portfolio-cache");
//!
//!     let provider = PortfolioProvider::new(&config, "solana", "SOL", Arc::new(RpcBalances))?;
//!
//!     let report = provider
//!         .report("Agent-X", "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM")
//!         .await;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```
//!
//! # Staleness
//!
//! The cache trades freshness for upstream cost: callers may observe data up
//! to one TTL old. Concurrent cold misses on the same key are not
//! de-duplicated, and backoff carries no jitter; both are documented
//! properties of the contract, not bugs.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod cache;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod provider;
pub mod retry;
pub mod source;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use cache::TieredQuoteCache;
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use portfolio::{format_portfolio, valuate};
pub use provider::{BalanceSource, PortfolioProvider, FALLBACK_REPORT};
pub use retry::{with_retry, RetryPolicy};
pub use source::{HttpPriceSource, PriceSource};
pub use store::{FileStore, MemoryStore, QuoteStore};
pub use types::{CacheEntry, CacheStats, PortfolioSnapshot, PriceQuote};

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::{
        BalanceSource, CacheEntry, CacheStats, Error, PortfolioProvider, PortfolioSnapshot,
        PriceQuote, PriceSource, ProviderConfig, QuoteStore, Result, RetryPolicy,
        TieredQuoteCache,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "agent-portfolio-core";
