//! Error types for the agent portfolio library
//!
//! This module defines the error hierarchy for quote fetching, cache tier
//! access, and portfolio valuation. Transient upstream failures (rate
//! limits, timeouts, network errors) are distinguishable from terminal ones
//! via [`Error::is_recoverable`], which callers may use as a classification
//! hook; the retry loop itself treats every error identically.

/// Result type alias for portfolio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for quote caching and portfolio operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// In-memory cache tier error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Persistent store read/write error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Price or balance fetch failed upstream
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Upstream rate limit (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Upstream request timed out
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Network error from the HTTP client
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed or unparseable price data
    #[error("Invalid quote: {0}")]
    InvalidQuote(String),

    /// Decimal parsing or arithmetic error
    #[error("Decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new cache error
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a new rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new invalid quote error
    pub fn invalid_quote(msg: impl Into<String>) -> Self {
        Self::InvalidQuote(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Check if error is due to rate limiting
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Check if error is recoverable (a retry may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::RateLimited(_) | Self::Timeout(_) | Self::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        let err = Error::storage("disk full");
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(err.to_string(), "Storage error: disk full");

        let err = Error::fetch("upstream 503");
        assert_eq!(err.to_string(), "Fetch error: upstream 503");
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::rate_limited("429").is_recoverable());
        assert!(Error::timeout("30s elapsed").is_recoverable());
        assert!(Error::fetch("connection reset").is_recoverable());

        assert!(!Error::config("missing path").is_recoverable());
        assert!(!Error::invalid_quote("negative price").is_recoverable());
        assert!(!Error::storage("permission denied").is_recoverable());
    }

    #[test]
    fn test_rate_limit_check() {
        assert!(Error::rate_limited("slow down").is_rate_limit());
        assert!(!Error::timeout("slow down").is_rate_limit());
    }

    #[test]
    fn test_json_conversion() {
        let bad = serde_json::from_str::<u64>("not json");
        let err: Error = bad.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_recoverable());
    }
}
