//! Core data types for quote caching and portfolio valuation
//!
//! This module defines the cache entry envelope shared by both cache tiers,
//! the price quote model, the portfolio snapshot produced by valuation, and
//! the cache hit/miss counters.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cached value with an absolute expiry instant
///
/// An entry is valid iff `now < expires_at`. This is the representation
/// persisted by the store tier, so it is fully serializable. Entries are
/// overwritten on refresh and never explicitly deleted; expiry is the only
/// removal signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub value: T,
    /// Absolute expiry instant
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create an entry expiring `ttl` from now
    ///
    /// TTLs beyond the representable range saturate to the far future.
    pub fn new(value: T, ttl: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { value, expires_at }
    }

    /// Create an entry with an explicit expiry instant
    pub fn with_expiry(value: T, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Check whether the entry is still valid
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }

    /// Check whether the entry has expired
    pub fn is_expired(&self) -> bool {
        !self.is_valid()
    }
}

/// A point-in-time price for one asset in a quote currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Asset identifier as known to the price source (e.g. "solana")
    pub asset: String,
    /// Unit price in the quote currency
    pub price: Decimal,
    /// Quote currency code (e.g. "usd")
    pub currency: String,
    /// Source that produced the quote
    pub source: String,
    /// When the quote was fetched
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Create a quote fetched now
    pub fn new(
        asset: impl Into<String>,
        price: Decimal,
        currency: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            asset: asset.into(),
            price,
            currency: currency.into(),
            source: source.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// A point-in-time valuation of a wallet's native holdings
///
/// Both totals are stored unrounded; rounding happens only in the display
/// helpers. A fresh snapshot is built on every cold cache path and is
/// immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Total value in the quote currency (unrounded)
    pub total_quote_value: Decimal,
    /// Total holdings in native units (unrounded)
    pub total_native_units: Decimal,
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    /// Quote-currency total rounded to 2 decimal places for display
    pub fn quote_display(&self) -> String {
        let mut value = self.total_quote_value.round_dp(2);
        value.rescale(2);
        value.to_string()
    }

    /// Native-unit total rounded to 4 decimal places for display
    pub fn native_display(&self) -> String {
        let mut value = self.total_native_units.round_dp(4);
        value.rescale(4);
        value.to_string()
    }
}

/// Cache hit/miss counters
///
/// `fetches` counts cold paths that reached the fetcher; `memory_hits` and
/// `store_hits` count the tier that served each warm read.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Reads served by the in-memory tier
    pub memory_hits: u64,
    /// Reads served by the persistent tier (promoted to memory)
    pub store_hits: u64,
    /// Reads that fell through to the fetcher
    pub fetches: u64,
}

impl CacheStats {
    /// Fraction of reads served without invoking the fetcher
    pub fn hit_rate(&self) -> f64 {
        let total = self.memory_hits + self.store_hits + self.fetches;
        if total == 0 {
            0.0
        } else {
            (self.memory_hits + self.store_hits) as f64 / total as f64
        }
    }
}
