//! Cache Module
//!
//! Bounded in-memory response cache with TTL expiration and LRU eviction,
//! keyed by request fingerprints.

mod entry;
mod fingerprint;
mod lru;
mod response_cache;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fingerprint::Fingerprint;
pub use lru::LruTracker;
pub use response_cache::ResponseCache;
pub use stats::CacheStats;
pub use store::CacheStore;
