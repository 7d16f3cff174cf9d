//! Client Module
//!
//! Cached, rate-limited access to the ORKL threat intelligence REST API.

mod query;
mod request;
mod upstream;

pub use query::{ClearCategory, LatestReportsQuery, OrderBy, SearchQuery, SortOrder};
pub use request::ApiRequest;
pub use upstream::UpstreamClient;
