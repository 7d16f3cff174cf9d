//! API Routes
//!
//! Configures the Axum router with all tool server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    call_tool_handler, health_handler, list_resources_handler, list_tools_handler,
    read_resource_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /stats` - Cache and rate limiter statistics
/// - `GET /tools` - Advertised tools with their argument schemas
/// - `POST /tools/:name` - Invoke a tool
/// - `GET /resources` - Advertised resource URI templates
/// - `GET /resources/read?uri=` - Read a resource
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/tools", get(list_tools_handler))
        .route("/tools/:name", post(call_tool_handler))
        .route("/resources", get(list_resources_handler))
        .route("/resources/read", get(read_resource_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
