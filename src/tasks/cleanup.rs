//! Expired Entry Sweep
//!
//! Background task that periodically removes expired response cache entries.
//! Expired entries are already invisible to lookups, so the sweep only
//! bounds memory held by entries nobody asks for again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResponseCache;

/// Spawns a background task that sweeps `cache` every `cleanup_interval_secs`.
///
/// The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: ResponseCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                info!("Cache cleanup: removed {} expired entries", removed);
            } else {
                debug!("Cache cleanup: no expired entries found");
            }
        }
    })
}
