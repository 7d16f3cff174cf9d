//! API Handlers
//!
//! HTTP request handlers for each tool server endpoint.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde_json::Value;

use crate::client::UpstreamClient;
use crate::config::Config;
use crate::error::{OrklError, Result};
use crate::models::{HealthResponse, ResourceQuery, ResourceResponse, StatsResponse, ToolCallResponse};
use crate::tools::{resource_templates, tool_definitions, ResourceTemplate, ToolDefinition, ToolDispatcher};

/// Application state shared across all handlers.
///
/// The dispatcher owns the upstream client, which in turn shares the
/// response cache and rate limiter between all clones.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: ToolDispatcher,
}

impl AppState {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Builds the upstream client, cache and limiter from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = UpstreamClient::new(config)?;
        Ok(Self::new(ToolDispatcher::new(client)))
    }

    pub fn client(&self) -> &UpstreamClient {
        self.dispatcher.client()
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
///
/// Reports cache counters and the rate limiter's current window.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let client = state.client();
    let cache = client.cache().stats().await;
    let capacity = client.cache().capacity().await;
    let rate_limit = client.limiter().snapshot().await;

    Json(StatsResponse::new(
        client.cache().is_enabled(),
        capacity,
        cache,
        rate_limit,
    ))
}

/// Handler for GET /tools
pub async fn list_tools_handler() -> Json<Vec<ToolDefinition>> {
    Json(tool_definitions())
}

/// Handler for POST /tools/:name
///
/// The body is the tool's argument object. An empty body means no arguments.
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ToolCallResponse>> {
    let args = tool_arguments(&headers, &body)?;
    let content = state.dispatcher.call(&name, args).await?;

    Ok(Json(ToolCallResponse::new(name, content)))
}

/// Parses a tool call body. A non-empty body must be JSON.
fn tool_arguments(headers: &HeaderMap, body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false);
    if !is_json {
        return Err(OrklError::InvalidArguments(
            "expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    let Json(args) =
        Json::<Value>::from_bytes(body).map_err(|e| OrklError::InvalidArguments(e.body_text()))?;
    Ok(args)
}

/// Handler for GET /resources
pub async fn list_resources_handler() -> Json<Vec<ResourceTemplate>> {
    Json(resource_templates())
}

/// Handler for GET /resources/read?uri=...
pub async fn read_resource_handler(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<ResourceResponse>> {
    let content = state.dispatcher.read_resource(&query.uri).await?;

    Ok(Json(ResourceResponse::new(query.uri, content)))
}
