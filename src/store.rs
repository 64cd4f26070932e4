//! Persistent store tier for cached quotes
//!
//! The cache's second tier is any key-value store that can hold a JSON
//! payload with an absolute expiry. The store is deliberately dumb: it
//! returns whatever is persisted for a key, expired or not, and the cache
//! layer enforces expiry. Its internal consistency under concurrent
//! key-scoped access is the implementation's responsibility; cross-key
//! interference is not expected.
//!
//! # On-disk format (FileStore)
//!
//! One JSON document per key:
//!
//! ```json
//! {
//!   "value": { "price": "142.35", "...": "..." },
//!   "expires_at": "2024-01-01T00:05:00Z"
//! }
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::CacheEntry;

/// A persisted cache entry with an erased payload type
pub type StoredEntry = CacheEntry<Value>;

/// Persistent key-value store for cache entries
///
/// Store failures are hard errors for the calling lookup; there is no
/// fallback to network-only operation.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Read the entry for a key, if any (expired entries included)
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>>;

    /// Write the entry for a key, overwriting any previous one
    async fn set(&self, key: &str, entry: StoredEntry) -> Result<()>;
}

/// File-backed store: one JSON document per key under a directory
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated document behind.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `path`, creating the directory if needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)
            .map_err(|e| Error::storage(format!("Failed to create store directory: {}", e)))?;
        Ok(Self { path })
    }

    /// File path for a cache key
    fn entry_file_path(&self, key: &str) -> PathBuf {
        self.path.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a cache key to a filesystem-safe file stem
///
/// Keys are opaque composite strings ("portfolio-<address>") and may contain
/// characters with path meaning; anything outside `[A-Za-z0-9._-]` becomes
/// an underscore.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl QuoteStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>> {
        let file_path = self.entry_file_path(key);

        let json_data = match tokio::fs::read_to_string(&file_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::storage(format!(
                    "Failed to read entry for {}: {}",
                    key, e
                )))
            }
        };

        let entry: StoredEntry = serde_json::from_str(&json_data)
            .map_err(|e| Error::serialization(format!("Failed to parse entry for {}: {}", key, e)))?;

        Ok(Some(entry))
    }

    async fn set(&self, key: &str, entry: StoredEntry) -> Result<()> {
        let file_path = self.entry_file_path(key);
        let json_data = serde_json::to_string_pretty(&entry)
            .map_err(|e| Error::serialization(format!("Failed to serialize entry: {}", e)))?;

        // Write atomically: temp file first, then rename into place
        let temp_path = file_path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json_data)
            .await
            .map_err(|e| Error::storage(format!("Failed to write entry for {}: {}", key, e)))?;

        tokio::fs::rename(&temp_path, &file_path)
            .await
            .map_err(|e| Error::storage(format!("Failed to commit entry for {}: {}", key, e)))?;

        debug!(key, path = %file_path.display(), "persisted cache entry");
        Ok(())
    }
}

/// In-memory store, for tests and embedders that want a volatile second tier
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, entry: StoredEntry) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(value: &str, ttl: Duration) -> StoredEntry {
        CacheEntry::new(Value::String(value.to_string()), ttl)
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path())?;

        store
            .set("price-solana", entry("142.35", Duration::from_secs(60)))
            .await?;

        let loaded = store.get("price-solana").await?.unwrap();
        assert_eq!(loaded.value, Value::String("142.35".to_string()));
        assert!(loaded.is_valid());

        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_missing_key_is_none() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path())?;

        assert!(store.get("portfolio-unknown").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_overwrite() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path())?;

        store
            .set("price-sui", entry("1.00", Duration::from_secs(60)))
            .await?;
        store
            .set("price-sui", entry("2.00", Duration::from_secs(60)))
            .await?;

        let loaded = store.get("price-sui").await?.unwrap();
        assert_eq!(loaded.value, Value::String("2.00".to_string()));

        // No stray temp file left behind
        assert!(!dir.path().join("price-sui.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_file_store_returns_expired_entries() -> Result<()> {
        // Expiry is the cache layer's job; the store reports what it has.
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path())?;

        store.set("price-ton", entry("5.55", Duration::ZERO)).await?;

        let loaded = store.get("price-ton").await?.unwrap();
        assert!(loaded.is_expired());
        Ok(())
    }

    #[tokio::test]
    async fn test_key_sanitization() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path())?;

        let key = "portfolio-0xAB/CD:99";
        store.set(key, entry("1", Duration::from_secs(60))).await?;

        assert!(store.get(key).await?.is_some());
        assert!(dir.path().join("portfolio-0xAB_CD_99.json").exists());
        Ok(())
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("price-solana"), "price-solana");
        assert_eq!(sanitize_key("a/b\\c d"), "a_b_c_d");
        assert_eq!(sanitize_key("0x1.2_3-4"), "0x1.2_3-4");
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() -> Result<()> {
        let store = MemoryStore::new();
        store
            .set("price-aptos", entry("9.87", Duration::from_secs(60)))
            .await?;

        let loaded = store.get("price-aptos").await?.unwrap();
        assert_eq!(loaded.value, Value::String("9.87".to_string()));
        assert!(store.get("price-other").await?.is_none());
        Ok(())
    }
}
