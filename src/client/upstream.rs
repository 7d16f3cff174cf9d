//! ORKL Upstream Client
//!
//! Every upstream operation goes through the same path: fingerprint the
//! request, answer from the response cache when possible, otherwise take a
//! rate-limiter slot, call the API and cache the successful result.

use std::time::Duration;

use reqwest::{header, Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::ResponseCache;
use crate::client::{ApiRequest, ClearCategory, LatestReportsQuery, SearchQuery};
use crate::config::Config;
use crate::error::{OrklError, Result};
use crate::limiter::RateLimiter;

/// `Retry-After` assumed when an upstream 429 does not carry one
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

const USER_AGENT: &str = concat!("orkl-mcp/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CachePolicy {
    Use,
    Bypass,
}

// == Upstream Client ==
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
    cache: ResponseCache,
    limiter: RateLimiter,
    ttl: Duration,
}

impl UpstreamClient {
    // == Constructors ==
    /// Creates a client with its own cache and rate limiter sized from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_parts(
            config,
            ResponseCache::from_config(config),
            RateLimiter::from_config(config),
        )
    }

    /// Creates a client around an existing cache and limiter.
    pub fn with_parts(config: &Config, cache: ResponseCache, limiter: RateLimiter) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            OrklError::Configuration(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| OrklError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            cache,
            limiter,
            ttl: config.ttl(),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    // == Fetch ==
    /// Returns the payload for `request`, from the cache when fresh.
    pub async fn fetch(&self, request: &ApiRequest) -> Result<Value> {
        self.execute(request, CachePolicy::Use).await
    }

    async fn execute(&self, request: &ApiRequest, policy: CachePolicy) -> Result<Value> {
        let fingerprint = request.fingerprint();

        if policy == CachePolicy::Use {
            if let Some(cached) = self.cache.get(&fingerprint).await {
                return Ok(cached);
            }
        }

        self.limiter.admit().await?;
        let value = self.send(request).await?;

        if policy == CachePolicy::Use {
            self.cache.put(&fingerprint, value.clone(), self.ttl).await;
        }
        Ok(value)
    }

    async fn send(&self, request: &ApiRequest) -> Result<Value> {
        let url = request.url(&self.base_url)?;
        debug!("GET {}", url);

        let response = self.http.get(url).send().await.map_err(transport_error)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(OrklError::RateLimitExceeded {
                retry_after: Some(retry_after),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(OrklError::NotFound(request.path()));
        }
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            return Err(OrklError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| OrklError::Decode(e.to_string()))
    }

    // == Threat Reports ==
    pub async fn latest_threat_reports(&self, query: &LatestReportsQuery) -> Result<Value> {
        let request = ApiRequest::new(["library", "entries"])
            .param("order_by", query.order_by)
            .param("order", query.order)
            .param_opt("limit", query.limit)
            .param_opt("offset", query.offset);
        self.fetch(&request).await
    }

    pub async fn threat_report(&self, report_id: &str) -> Result<Option<Value>> {
        found(self.fetch(&ApiRequest::new(["library", "entry", report_id])).await)
    }

    pub async fn threat_report_by_hash(&self, sha1: &str) -> Result<Option<Value>> {
        found(
            self.fetch(&ApiRequest::new(["library", "entry", "sha1", sha1]))
                .await,
        )
    }

    pub async fn search_threat_reports(&self, query: &SearchQuery) -> Result<Value> {
        let request = ApiRequest::new(["library", "search"])
            .param("query", &query.query)
            .param("full", query.full)
            .param("limit", query.limit);
        self.fetch(&request).await
    }

    // == Library ==
    pub async fn library_info(&self) -> Result<Value> {
        self.fetch(&ApiRequest::new(["library", "info"])).await
    }

    pub async fn library_version(&self) -> Result<Value> {
        self.fetch(&ApiRequest::new(["library", "version"])).await
    }

    // == Threat Actors ==
    pub async fn threat_actors(&self) -> Result<Value> {
        self.fetch(&ApiRequest::new(["ta", "entries"])).await
    }

    pub async fn threat_actor(&self, actor_id: &str) -> Result<Option<Value>> {
        found(self.fetch(&ApiRequest::new(["ta", "entry", actor_id])).await)
    }

    // == Sources ==
    pub async fn sources(&self) -> Result<Value> {
        self.fetch(&ApiRequest::new(["source", "entries"])).await
    }

    pub async fn source(&self, source_id: &str, full: bool) -> Result<Option<Value>> {
        let request = ApiRequest::new(["source", "entry", source_id]).param("full", full);
        found(self.fetch(&request).await)
    }

    // == Cache Control ==
    /// Drops cached responses for `category`, returning how many were removed.
    pub async fn clear_cache(&self, category: ClearCategory) -> usize {
        let removed = match category.prefix() {
            Some(prefix) => self.cache.clear_prefix(prefix).await,
            None => self.cache.clear().await,
        };
        info!("Cleared {} cached responses ({})", removed, category.as_str());
        removed
    }

    // == Connectivity ==
    /// Fetches library info without touching the cache.
    pub async fn check_connectivity(&self) -> Result<()> {
        self.execute(&ApiRequest::new(["library", "info"]), CachePolicy::Bypass)
            .await
            .map(|_| ())
    }
}

/// Turns an upstream 404 into an absent result.
fn found(result: Result<Value>) -> Result<Option<Value>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(OrklError::NotFound(path)) => {
            debug!("Upstream has no entity at {}", path);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// Connection failures and timeouts are both retryable from the caller's side.
fn transport_error(err: reqwest::Error) -> OrklError {
    if err.is_timeout() {
        OrklError::UpstreamTimeout(format!("request timed out: {}", err))
    } else {
        OrklError::UpstreamTimeout(format!("request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_base_url() {
        let config = Config {
            base_url: "::not-a-url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            UpstreamClient::new(&config),
            Err(OrklError::Configuration(_))
        ));
    }

    #[test]
    fn test_found_maps_not_found_to_none() {
        let result = found(Err(OrklError::NotFound("/ta/entry/x".to_string())));
        assert!(matches!(result, Ok(None)));

        let result = found(Err(OrklError::UpstreamHttp { status: 500, body: None }));
        assert!(matches!(result, Err(OrklError::UpstreamHttp { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_retryable_and_uncached() {
        let config = Config {
            base_url: "http://127.0.0.1:1/api/v1".to_string(),
            request_timeout: 2,
            ..Config::default()
        };
        let client = UpstreamClient::new(&config).unwrap();

        let err = client.library_info().await.unwrap_err();
        assert!(matches!(err, OrklError::UpstreamTimeout(_)));
        assert!(err.is_retryable());
        assert_eq!(client.cache().len().await, 0);
        assert_eq!(client.limiter().total_admitted(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_by_category() {
        let client = UpstreamClient::new(&Config::default()).unwrap();
        let ttl = Duration::from_secs(60);
        for path in [
            vec!["library", "entry", "1"],
            vec!["ta", "entry", "1"],
            vec!["source", "entry", "1"],
        ] {
            let fp = ApiRequest::new(path).fingerprint();
            client.cache().put(&fp, Value::Bool(true), ttl).await;
        }

        assert_eq!(client.clear_cache(ClearCategory::ThreatReports).await, 1);
        assert_eq!(client.cache().len().await, 2);
        assert_eq!(client.clear_cache(ClearCategory::All).await, 2);
        assert_eq!(client.cache().len().await, 0);
    }
}
