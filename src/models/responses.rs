//! Response DTOs
//!
//! Structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::limiter::RateLimitSnapshot;

/// Result of a tool invocation (POST /tools/:name)
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResponse {
    pub tool: String,
    /// Tool output; `null` when the requested entity does not exist
    pub content: Value,
}

impl ToolCallResponse {
    pub fn new(tool: impl Into<String>, content: Value) -> Self {
        Self {
            tool: tool.into(),
            content,
        }
    }
}

/// Result of a resource read (GET /resources/read)
#[derive(Debug, Clone, Serialize)]
pub struct ResourceResponse {
    pub uri: String,
    pub content: Value,
}

impl ResourceResponse {
    pub fn new(uri: impl Into<String>, content: Value) -> Self {
        Self {
            uri: uri.into(),
            content,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache_enabled: bool,
    /// Maximum number of cached responses
    pub cache_capacity: usize,
    pub cache: CacheStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub rate_limit: RateLimitSnapshot,
}

impl StatsResponse {
    pub fn new(
        cache_enabled: bool,
        cache_capacity: usize,
        cache: CacheStats,
        rate_limit: RateLimitSnapshot,
    ) -> Self {
        Self {
            cache_enabled,
            cache_capacity,
            hit_rate: cache.hit_rate(),
            cache,
            rate_limit,
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error kind
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, kind: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
            retry_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_response_serialize() {
        let resp = ToolCallResponse::new("fetch_sources", json!([{"name": "CERT"}]));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["tool"], "fetch_sources");
        assert_eq!(json["content"][0]["name"], "CERT");
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let cache = CacheStats {
            hits: 8,
            misses: 2,
            ..CacheStats::default()
        };
        let limiter = RateLimitSnapshot {
            limit: 90,
            period_secs: 30.0,
            in_window: 2,
            total_admitted: 2,
        };
        let resp = StatsResponse::new(true, 1000, cache, limiter);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(serde_json::to_value(&resp).unwrap()["cache_capacity"], 1000);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_omits_missing_retry_after() {
        let json = serde_json::to_value(ErrorResponse::new("boom", "upstream_http_error", None)).unwrap();
        assert!(json.get("retry_after").is_none());

        let json = serde_json::to_value(ErrorResponse::new("slow down", "rate_limit_exceeded", Some(30))).unwrap();
        assert_eq!(json["retry_after"], 30);
    }
}
