//! Configuration for the portfolio provider
//!
//! Settings structs with serde defaults, builder-style overrides, and file
//! loading. Configuration can come from:
//! 1. Builder methods (highest priority)
//! 2. Configuration files (YAML/JSON)
//! 3. Default values
//!
//! # Example
//!
//! ```no_run
//! use agent_portfolio_core::config::ProviderConfig;
//!
//! let config = ProviderConfig::default()
//!     .with_ttl_seconds(120)
//!     .with_max_attempts(5);
//!
//! // Or load from a file
//! let config = ProviderConfig::from_file("provider.yaml")?;
//! # Ok::<(), agent_portfolio_core::Error>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration for a portfolio provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Cache tier settings
    pub cache: CacheSettings,
    /// Fetch retry settings
    pub retry: RetrySettings,
    /// Persistent store settings
    pub store: StoreSettings,
    /// Price source settings
    pub source: SourceSettings,
}

/// Cache tier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Time-to-live for cached values, in seconds
    ///
    /// Short by design: prices and balances are volatile, and callers must
    /// tolerate data up to this old.
    pub ttl_seconds: u64,
}

/// Retry settings for network-bound fetches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Maximum fetch attempts, including the first (1 = no retry)
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; doubles per failed attempt
    pub base_delay_ms: u64,
}

/// Persistent store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Directory holding one JSON document per cache key
    pub path: PathBuf,
}

/// Price source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Base URL of the price API
    pub base_url: String,
    /// Quote currency to request prices in
    pub currency: String,
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            retry: RetrySettings::default(),
            store: StoreSettings::default(),
            source: SourceSettings::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_seconds: 300 }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 2_000,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./portfolio-cache"),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            currency: "usd".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a YAML or JSON file (by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .map_err(|e| Error::config(format!("Invalid YAML config: {}", e))),
            Some("json") => serde_json::from_str(&contents)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e))),
            other => Err(Error::config(format!(
                "Unsupported config extension: {:?}",
                other
            ))),
        }
    }

    /// Set the cache TTL in seconds
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.cache.ttl_seconds = ttl_seconds;
        self
    }

    /// Set the maximum fetch attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry.max_attempts = max_attempts;
        self
    }

    /// Set the base backoff delay in milliseconds
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.retry.base_delay_ms = base_delay_ms;
        self
    }

    /// Set the persistent store directory
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.path = path.into();
        self
    }

    /// Set the price source base URL
    pub fn with_source_url(mut self, base_url: impl Into<String>) -> Self {
        self.source.base_url = base_url.into();
        self
    }

    /// Set the quote currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.source.currency = currency.into();
        self
    }

    /// Cache TTL as a [`Duration`]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }
}
