//! API Module
//!
//! HTTP handlers and routing for the tool server.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache and rate limiter statistics
//! - `GET /tools` - List tools
//! - `POST /tools/:name` - Call a tool
//! - `GET /resources` - List resource templates
//! - `GET /resources/read` - Read a resource by URI

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
