//! Request and Response models for the tool server API
//!
//! DTOs for tool arguments and HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    ActorDetailsArgs, ClearCacheArgs, LatestReportsArgs, ReportByHashArgs, ReportDetailsArgs,
    ResourceQuery, SearchArgs, SourceDetailsArgs,
};
pub use responses::{
    ErrorResponse, HealthResponse, ResourceResponse, StatsResponse, ToolCallResponse,
};
