//! Request DTOs
//!
//! Argument bodies accepted by each tool, plus the resource read query.

use serde::Deserialize;

use crate::client::{LatestReportsQuery, OrderBy, SearchQuery, SortOrder};

const DEFAULT_LATEST_LIMIT: u32 = 10;
const DEFAULT_SEARCH_LIMIT: u32 = 1000;

/// Arguments for `fetch_latest_threat_reports`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LatestReportsArgs {
    /// Maximum number of reports (default: 10)
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// created_at, updated_at, file_creation_date or file_modification_date
    pub order_by: OrderBy,
    /// asc or desc
    pub order: SortOrder,
}

impl Default for LatestReportsArgs {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LATEST_LIMIT),
            offset: None,
            order_by: OrderBy::default(),
            order: SortOrder::default(),
        }
    }
}

impl From<LatestReportsArgs> for LatestReportsQuery {
    fn from(args: LatestReportsArgs) -> Self {
        Self {
            limit: args.limit,
            offset: args.offset,
            order_by: args.order_by,
            order: args.order,
        }
    }
}

/// Arguments for `fetch_threat_report_details`
#[derive(Debug, Clone, Deserialize)]
pub struct ReportDetailsArgs {
    pub report_id: String,
}

impl ReportDetailsArgs {
    pub fn validate(&self) -> Option<String> {
        require("report_id", &self.report_id)
    }
}

/// Arguments for `fetch_threat_report_by_hash`
#[derive(Debug, Clone, Deserialize)]
pub struct ReportByHashArgs {
    #[serde(alias = "sha1")]
    pub sha1_hash: String,
}

impl ReportByHashArgs {
    pub fn validate(&self) -> Option<String> {
        require("sha1_hash", &self.sha1_hash)
    }
}

/// Arguments for `search_threat_reports`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchArgs {
    /// Search terms, quote them for exact matches
    pub query: String,
    #[serde(default)]
    pub full: bool,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

impl SearchArgs {
    pub fn validate(&self) -> Option<String> {
        require("query", &self.query)
    }
}

impl From<SearchArgs> for SearchQuery {
    fn from(args: SearchArgs) -> Self {
        Self {
            query: args.query,
            full: args.full,
            limit: args.limit,
        }
    }
}

/// Arguments for `fetch_threat_actor_details`
#[derive(Debug, Clone, Deserialize)]
pub struct ActorDetailsArgs {
    pub actor_id: String,
}

impl ActorDetailsArgs {
    pub fn validate(&self) -> Option<String> {
        require("actor_id", &self.actor_id)
    }
}

/// Arguments for `fetch_source_details`
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDetailsArgs {
    pub source_id: String,
    /// Include related reports
    #[serde(default)]
    pub full: bool,
}

impl SourceDetailsArgs {
    pub fn validate(&self) -> Option<String> {
        require("source_id", &self.source_id)
    }
}

/// Arguments for `clear_cache`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClearCacheArgs {
    /// threat_reports, threat_actors, sources or all (default)
    pub category: Option<String>,
}

/// Query string for `GET /resources/read`
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceQuery {
    pub uri: String,
}

fn require(field: &str, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} is required", field))
    } else {
        None
    }
}
