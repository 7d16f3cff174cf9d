//! Configuration Module
//!
//! Resolves server configuration once at startup: built-in defaults, then the
//! optional JSON config file, then `ORKL_*` environment variables.

use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{OrklError, Result};

/// Default ORKL API endpoint
pub const DEFAULT_BASE_URL: &str = "https://orkl.eu/api/v1";

/// Config file consulted when `ORKL_CONFIG_FILE` is unset
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Server configuration parameters.
///
/// Immutable after [`Config::load`]; passed by reference into the cache,
/// rate limiter and upstream client constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the ORKL REST API
    pub base_url: String,
    /// Upstream request timeout in seconds
    pub request_timeout: u64,
    /// Lifetime of cached responses in seconds
    pub cache_ttl: u64,
    /// Whether responses are cached at all
    pub use_cache: bool,
    /// Maximum outbound requests per window
    pub rate_limit_requests: usize,
    /// Rate limit window in seconds
    pub rate_limit_period: u64,
    /// JSON file the configuration was read from
    pub config_file: PathBuf,
    /// Maximum number of cached responses before LRU eviction
    pub cache_max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Expiry sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

// == File Schema ==
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
    request_timeout: Option<u64>,
    #[serde(default)]
    cache: FileCacheSection,
    #[serde(default)]
    rate_limit: FileRateLimitSection,
}

#[derive(Debug, Default, Deserialize)]
struct FileCacheSection {
    ttl: Option<u64>,
    enable: Option<bool>,
    max_entries: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileRateLimitSection {
    requests_per_window: Option<usize>,
    window_seconds: Option<u64>,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `ORKL_API_BASE_URL` - API base URL (default: https://orkl.eu/api/v1)
    /// - `ORKL_REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `ORKL_CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `ORKL_USE_CACHE` - 1/0 or true/false (default: 1)
    /// - `ORKL_RATE_LIMIT_REQUESTS` - Requests per window (default: 90)
    /// - `ORKL_RATE_LIMIT_PERIOD` - Window length in seconds (default: 30)
    /// - `ORKL_CONFIG_FILE` - JSON config file (default: config.json)
    /// - `ORKL_CACHE_MAX_ENTRIES` - Cache capacity (default: 1000)
    /// - `ORKL_SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ORKL_CLEANUP_INTERVAL` - Expiry sweep interval in seconds (default: 60)
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Config::default();
        if let Some(path) = lookup("ORKL_CONFIG_FILE") {
            config.config_file = PathBuf::from(path);
        }

        let file = config.config_file.clone();
        config.apply_file(&file);
        config.apply_env(&lookup)?;
        config.validate()?;

        Ok(config)
    }

    // == File Layer ==
    /// Applies values from the JSON config file.
    ///
    /// A missing file is silently skipped; an unreadable or malformed file is
    /// logged and skipped.
    fn apply_file(&mut self, path: &Path) {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return;
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<FileConfig>(&raw).map_err(|e| e.to_string()));

        let file = match parsed {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to load config file {}: {}", path.display(), e);
                return;
            }
        };

        if let Some(url) = file.api_base_url {
            self.base_url = url;
        }
        if let Some(timeout) = file.request_timeout {
            self.request_timeout = timeout;
        }
        if let Some(ttl) = file.cache.ttl {
            self.cache_ttl = ttl;
        }
        if let Some(enable) = file.cache.enable {
            self.use_cache = enable;
        }
        if let Some(max_entries) = file.cache.max_entries {
            self.cache_max_entries = max_entries;
        }
        if let Some(requests) = file.rate_limit.requests_per_window {
            self.rate_limit_requests = requests;
        }
        if let Some(window) = file.rate_limit.window_seconds {
            self.rate_limit_period = window;
        }
    }

    // == Environment Layer ==
    fn apply_env<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ORKL_API_BASE_URL") {
            self.base_url = url.trim().to_string();
        }
        if let Some(timeout) = parse_var(lookup, "ORKL_REQUEST_TIMEOUT")? {
            self.request_timeout = timeout;
        }
        if let Some(ttl) = parse_var(lookup, "ORKL_CACHE_TTL")? {
            self.cache_ttl = ttl;
        }
        if let Some(raw) = lookup("ORKL_USE_CACHE") {
            self.use_cache = parse_flag("ORKL_USE_CACHE", &raw)?;
        }
        if let Some(requests) = parse_var(lookup, "ORKL_RATE_LIMIT_REQUESTS")? {
            self.rate_limit_requests = requests;
        }
        if let Some(period) = parse_var(lookup, "ORKL_RATE_LIMIT_PERIOD")? {
            self.rate_limit_period = period;
        }
        if let Some(max_entries) = parse_var(lookup, "ORKL_CACHE_MAX_ENTRIES")? {
            self.cache_max_entries = max_entries;
        }
        if let Some(port) = parse_var(lookup, "ORKL_SERVER_PORT")? {
            self.server_port = port;
        }
        if let Some(interval) = parse_var(lookup, "ORKL_CLEANUP_INTERVAL")? {
            self.cleanup_interval = interval;
        }
        Ok(())
    }

    // == Validation ==
    /// Rejects configurations the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            OrklError::Configuration(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OrklError::Configuration(format!(
                "base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout == 0 {
            return Err(OrklError::Configuration(
                "request timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    // == Derived Durations ==
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_period)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: 30,
            cache_ttl: 300,
            use_cache: true,
            rate_limit_requests: 90,
            rate_limit_period: 30,
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            cache_max_entries: 1000,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

// == Parsing Helpers ==
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| OrklError::Configuration(format!("{}='{}': {}", key, raw, e)))
        })
        .transpose()
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(OrklError::Configuration(format!(
            "{}='{}': expected 1 or 0",
            key, other
        ))),
    }
}
