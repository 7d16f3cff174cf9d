//! ORKL MCP - Tool server for the ORKL threat intelligence library
//!
//! Exposes ORKL reports, threat actors and sources as named tools and
//! addressable resources, with a TTL/LRU response cache and a sliding-window
//! rate limiter in front of the upstream API.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;
pub mod tools;

pub use api::{create_router, AppState};
pub use client::UpstreamClient;
pub use config::Config;
pub use error::{OrklError, Result};
pub use tasks::spawn_cleanup_task;
pub use tools::ToolDispatcher;
