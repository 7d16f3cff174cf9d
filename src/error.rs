//! Error types for the ORKL tool server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::models::ErrorResponse;

// == ORKL Error Enum ==
/// Unified error type for the tool server.
#[derive(Error, Debug)]
pub enum OrklError {
    /// Invalid or unusable configuration, fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Outbound quota exhausted, either locally or reported by the upstream
    #[error("Rate limit exceeded")]
    RateLimitExceeded {
        /// Seconds the caller should wait before retrying, when known
        retry_after: Option<u64>,
    },

    /// Upstream could not be reached or did not answer within the timeout
    #[error("Upstream unavailable: {0}")]
    UpstreamTimeout(String),

    /// Upstream answered with a non-success status
    #[error("API error: {status}")]
    UpstreamHttp {
        status: u16,
        body: Option<Value>,
    },

    /// Upstream has no such entity
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream body could not be decoded as JSON
    #[error("Invalid upstream response: {0}")]
    Decode(String),

    /// Tool arguments failed to parse or validate
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

impl OrklError {
    // == Retryable ==
    /// Returns true if the same call may succeed when retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrklError::RateLimitExceeded { .. } | OrklError::UpstreamTimeout(_)
        )
    }

    // == Kind ==
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            OrklError::Configuration(_) => "configuration_error",
            OrklError::RateLimitExceeded { .. } => "rate_limit_exceeded",
            OrklError::UpstreamTimeout(_) => "upstream_timeout",
            OrklError::UpstreamHttp { .. } => "upstream_http_error",
            OrklError::NotFound(_) => "not_found",
            OrklError::Decode(_) => "decode_error",
            OrklError::InvalidArguments(_) => "invalid_arguments",
            OrklError::UnknownTool(_) => "unknown_tool",
            OrklError::UnknownResource(_) => "unknown_resource",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            OrklError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OrklError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            OrklError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            OrklError::UpstreamHttp { .. } | OrklError::Decode(_) => StatusCode::BAD_GATEWAY,
            OrklError::NotFound(_)
            | OrklError::UnknownTool(_)
            | OrklError::UnknownResource(_) => StatusCode::NOT_FOUND,
            OrklError::InvalidArguments(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for OrklError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let retry_after = match &self {
            OrklError::RateLimitExceeded { retry_after } => *retry_after,
            _ => None,
        };

        let body = ErrorResponse::new(self.to_string(), self.kind(), retry_after);
        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the tool server.
pub type Result<T> = std::result::Result<T, OrklError>;
