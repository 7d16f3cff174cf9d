//! Background Tasks Module
//!
//! # Tasks
//! - Cache cleanup: sweeps expired response cache entries at the configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
