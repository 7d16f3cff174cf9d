//! Limiter Module
//!
//! Sliding-window quota on outbound ORKL requests.

mod rate_limiter;
mod window;

pub use rate_limiter::{RateLimitSnapshot, RateLimiter};
pub use window::RateWindow;
