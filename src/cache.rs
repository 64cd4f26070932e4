//! Two-tier TTL cache for externally fetched, time-sensitive data
//!
//! The fast tier is an in-process map; the slow tier is a [`QuoteStore`]
//! that survives restarts and is shared across related lookups. Values are
//! stored as JSON so one cache instance can hold heterogeneous payloads
//! (price quotes, portfolio snapshots) under namespaced keys.
//!
//! The TTL is short by design. Prices and balances are volatile, and the
//! cache trades staleness for upstream cost; callers must tolerate data up
//! to one TTL old. This is not a consistency guarantee.
//!
//! Concurrent cold misses on the same key are NOT de-duplicated: each caller
//! runs its own fetch and the last write wins. Single-flight would remove
//! the duplicate upstream calls, but the observed contract does not promise
//! it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::store::{QuoteStore, StoredEntry};
use crate::types::{CacheEntry, CacheStats};

/// Two-tier (memory + persistent) TTL cache
///
/// Construct one instance per process and share it by reference; there is no
/// ambient global cache. A fresh instance starts with an empty memory tier
/// and whatever the store already holds.
pub struct TieredQuoteCache {
    memory: RwLock<HashMap<String, StoredEntry>>,
    store: Arc<dyn QuoteStore>,
    stats: Mutex<CacheStats>,
}

impl TieredQuoteCache {
    /// Create a cache backed by the given persistent store
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            store,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Return the cached value for `key`, fetching and caching it if absent
    ///
    /// Lookup order:
    /// 1. memory tier — valid entry returned with no I/O;
    /// 2. persistent tier — valid entry promoted into memory and returned;
    /// 3. `fetcher` — result written to both tiers with
    ///    `expires_at = now + ttl`, then returned.
    ///
    /// A fetcher error propagates unchanged and nothing is cached. A store
    /// read or write error is fatal for the call; there is no network-only
    /// fallback.
    #[instrument(skip(self, ttl, fetcher))]
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl: Duration, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // Fast tier: no I/O on a hit.
        {
            let memory = self.memory.read().await;
            if let Some(entry) = memory.get(key) {
                if entry.is_valid() {
                    let value = serde_json::from_value(entry.value.clone())?;
                    self.stats.lock().await.memory_hits += 1;
                    debug!(key, "memory tier hit");
                    return Ok(value);
                }
            }
        }

        // Slow tier: one store round-trip, no network.
        if let Some(entry) = self.store.get(key).await? {
            if entry.is_valid() {
                let value = serde_json::from_value(entry.value.clone())?;
                self.memory
                    .write()
                    .await
                    .insert(key.to_string(), entry);
                self.stats.lock().await.store_hits += 1;
                debug!(key, "store tier hit, promoted to memory");
                return Ok(value);
            }
        }

        // Cold path: fetch live data, then write back to both tiers.
        let value = fetcher().await?;
        let entry = CacheEntry::new(serde_json::to_value(&value)?, ttl);

        self.store.set(key, entry.clone()).await?;
        self.memory.write().await.insert(key.to_string(), entry);
        self.stats.lock().await.fetches += 1;
        debug!(key, ttl_ms = ttl.as_millis() as u64, "fetched and cached");

        Ok(value)
    }

    /// Snapshot of the hit/miss counters
    pub async fn stats(&self) -> CacheStats {
        *self.stats.lock().await
    }
}
