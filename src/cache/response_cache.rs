//! Shared Response Cache
//!
//! Thread-safe handle around [`CacheStore`] used by the upstream client.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, Fingerprint};
use crate::config::Config;

// == Response Cache ==
/// Cloneable handle to the process-wide response cache.
///
/// When disabled, `get` always misses and `put` does nothing, so callers never
/// need to check whether caching is on.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    store: Arc<Mutex<CacheStore>>,
    enabled: bool,
}

impl ResponseCache {
    pub fn new(max_entries: usize, enabled: bool) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(max_entries))),
            enabled,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_max_entries, config.use_cache)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Get ==
    pub async fn get(&self, fingerprint: &Fingerprint) -> Option<Value> {
        let mut store = self.store.lock().await;
        if !self.enabled {
            store.record_miss();
            return None;
        }

        let value = store.get(fingerprint.as_str());
        debug!(
            "Cache {} for {}",
            if value.is_some() { "hit" } else { "miss" },
            fingerprint
        );
        value
    }

    // == Put ==
    pub async fn put(&self, fingerprint: &Fingerprint, value: Value, ttl: Duration) {
        if !self.enabled {
            return;
        }
        self.store
            .lock()
            .await
            .set(fingerprint.to_string(), value, ttl);
    }

    // == Clear ==
    /// Drops every cached response, returning how many were removed.
    pub async fn clear(&self) -> usize {
        self.store.lock().await.clear()
    }

    /// Drops cached responses whose fingerprint starts with `prefix`.
    pub async fn clear_prefix(&self, prefix: &str) -> usize {
        self.store.lock().await.clear_prefix(prefix)
    }

    // == Maintenance ==
    pub async fn cleanup_expired(&self) -> usize {
        self.store.lock().await.cleanup_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Maximum number of responses held at once.
    pub async fn capacity(&self) -> usize {
        self.store.lock().await.max_entries()
    }
}
