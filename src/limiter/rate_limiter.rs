//! Outbound Rate Limiter
//!
//! Gates every upstream request behind a sliding-window quota of
//! `limit` calls per `period`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::error::{OrklError, Result};
use crate::limiter::RateWindow;

/// Point-in-time view of the limiter, reported by the stats endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RateLimitSnapshot {
    pub limit: usize,
    pub period_secs: f64,
    pub in_window: usize,
    pub total_admitted: u64,
}

// == Rate Limiter ==
/// Cloneable handle to the shared call window.
///
/// [`admit`](Self::admit) waits for a free slot instead of failing, except
/// when the limit is zero: then no call can ever be admitted and it fails
/// immediately with [`OrklError::RateLimitExceeded`]. A zero period turns
/// limiting off.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Arc<Mutex<RateWindow>>,
    admitted: Arc<AtomicU64>,
}

impl RateLimiter {
    pub fn new(limit: usize, period: Duration) -> Self {
        Self {
            window: Arc::new(Mutex::new(RateWindow::new(limit, period))),
            admitted: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_requests, config.rate_limit_window())
    }

    // == Admit ==
    /// Waits until a call may be sent upstream and records it.
    ///
    /// The window lock is released while sleeping, so concurrent callers
    /// re-check the window after every wake-up.
    pub async fn admit(&self) -> Result<()> {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                if window.period().is_zero() {
                    break;
                }
                if window.limit() == 0 {
                    return Err(OrklError::RateLimitExceeded { retry_after: None });
                }
                match window.try_admit(Instant::now()) {
                    Ok(()) => break,
                    Err(wait) => wait,
                }
            };

            debug!("Rate limit reached, waiting {:?} for a free slot", wait);
            tokio::time::sleep(wait).await;
        }

        self.admitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Total calls admitted since startup.
    pub fn total_admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    pub async fn snapshot(&self) -> RateLimitSnapshot {
        let mut window = self.window.lock().await;
        RateLimitSnapshot {
            limit: window.limit(),
            period_secs: window.period().as_secs_f64(),
            in_window: window.in_window(Instant::now()),
            total_admitted: self.total_admitted(),
        }
    }
}
