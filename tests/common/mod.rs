//! Fake ORKL upstream shared by the integration tests.
//!
//! Serves canned `/api/v1/...` payloads on an ephemeral port and records every
//! path it is asked for, so tests can tell cache hits from network calls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use orkl_mcp::Config;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Identifier the fake upstream answers with 404.
pub const MISSING_ID: &str = "missing";
/// Identifier the fake upstream answers with 500.
pub const BROKEN_ID: &str = "broken";
/// Identifier the fake upstream answers with 429 and `Retry-After: 7`.
pub const THROTTLED_ID: &str = "throttled";
/// Identifier the fake upstream answers with a non-JSON body.
pub const GARBLED_ID: &str = "garbled";
/// Identifier the fake upstream answers only after two seconds.
pub const SLOW_ID: &str = "slow";

#[derive(Default)]
pub struct FakeUpstream {
    requests: Mutex<Vec<String>>,
}

impl FakeUpstream {
    fn record(&self, uri: &Uri) {
        self.requests
            .lock()
            .unwrap()
            .push(uri.path().trim_start_matches("/api/v1").to_string());
    }

    /// Total number of requests received.
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Number of requests received for `path` (without the `/api/v1` prefix).
    pub fn hits_for(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

type Shared = State<Arc<FakeUpstream>>;
type Params = Query<HashMap<String, String>>;

async fn library_info(State(up): Shared, uri: Uri) -> Json<Value> {
    up.record(&uri);
    Json(json!({"status": "success", "data": {"name": "ORKL", "entries": 2}}))
}

async fn library_version(State(up): Shared, uri: Uri) -> Json<Value> {
    up.record(&uri);
    Json(json!({"status": "success", "data": {"version": 42}}))
}

async fn library_entries(State(up): Shared, uri: Uri, Query(params): Params) -> Json<Value> {
    up.record(&uri);
    Json(json!({
        "status": "success",
        "data": [{"id": "r1"}, {"id": "r2"}],
        "params": params,
    }))
}

async fn library_search(State(up): Shared, uri: Uri, Query(params): Params) -> Json<Value> {
    up.record(&uri);
    Json(json!({
        "status": "success",
        "data": [{"id": "r1", "title": "Lazarus"}],
        "params": params,
    }))
}

async fn library_entry(State(up): Shared, uri: Uri, Path(id): Path<String>) -> Response {
    up.record(&uri);
    match id.as_str() {
        MISSING_ID => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
        BROKEN_ID => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "boom"})),
        )
            .into_response(),
        THROTTLED_ID => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "7")],
            "slow down",
        )
            .into_response(),
        GARBLED_ID => (StatusCode::OK, "<html>not json</html>").into_response(),
        SLOW_ID => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({"data": {"id": id}})).into_response()
        }
        _ => Json(json!({"status": "success", "data": {"id": id}})).into_response(),
    }
}

async fn library_entry_by_hash(State(up): Shared, uri: Uri, Path(sha1): Path<String>) -> Json<Value> {
    up.record(&uri);
    Json(json!({"status": "success", "data": {"sha1_hash": sha1}}))
}

async fn actor_entries(State(up): Shared, uri: Uri) -> Json<Value> {
    up.record(&uri);
    Json(json!({"status": "success", "data": [{"id": "a1", "main_name": "APT28"}]}))
}

async fn actor_entry(State(up): Shared, uri: Uri, Path(id): Path<String>) -> Response {
    up.record(&uri);
    if id == MISSING_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({"status": "success", "data": {"id": id, "main_name": "APT28"}})).into_response()
}

async fn source_entries(State(up): Shared, uri: Uri) -> Json<Value> {
    up.record(&uri);
    Json(json!({"status": "success", "data": [{"id": "s1", "name": "CERT"}]}))
}

async fn source_entry(
    State(up): Shared,
    uri: Uri,
    Path(id): Path<String>,
    Query(params): Params,
) -> Response {
    up.record(&uri);
    if id == MISSING_ID {
        return StatusCode::NOT_FOUND.into_response();
    }
    let full = params.get("full").cloned().unwrap_or_default();
    Json(json!({"status": "success", "data": {"id": id, "full": full}})).into_response()
}

/// Starts the fake upstream and returns its base URL (ending in `/api/v1`).
pub async fn spawn_upstream() -> (String, Arc<FakeUpstream>) {
    let upstream = Arc::new(FakeUpstream::default());

    let app = Router::new()
        .route("/api/v1/library/info", get(library_info))
        .route("/api/v1/library/version", get(library_version))
        .route("/api/v1/library/entries", get(library_entries))
        .route("/api/v1/library/search", get(library_search))
        .route("/api/v1/library/entry/:id", get(library_entry))
        .route("/api/v1/library/entry/sha1/:hash", get(library_entry_by_hash))
        .route("/api/v1/ta/entries", get(actor_entries))
        .route("/api/v1/ta/entry/:id", get(actor_entry))
        .route("/api/v1/source/entries", get(source_entries))
        .route("/api/v1/source/entry/:id", get(source_entry))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/v1", addr), upstream)
}

/// Configuration pointing at `base_url` with a generous rate limit.
pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        request_timeout: 5,
        cache_ttl: 300,
        use_cache: true,
        rate_limit_requests: 90,
        rate_limit_period: 30,
        ..Config::default()
    }
}
