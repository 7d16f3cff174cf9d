//! Cache Store Module
//!
//! Bounded response store combining HashMap storage with LRU tracking and TTL
//! expiration. Not synchronized; see [`ResponseCache`](super::ResponseCache)
//! for the shared handle.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    /// Fingerprint to payload
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    stats: CacheStats,
    /// Maximum number of entries allowed, 0 stores nothing
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` responses.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// An existing entry is overwritten and its TTL reset. At capacity, the
    /// least recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: Value, ttl: Duration) {
        if self.max_entries == 0 {
            return;
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Record Miss ==
    /// Counts a lookup that bypassed the store entirely.
    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    // == Clear ==
    /// Removes every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
        count
    }

    // == Clear Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    pub fn clear_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        self.lru.retain(|key| !key.starts_with(prefix));
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}
