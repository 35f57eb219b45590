//! Structured errors for the search tools.
//!
//! Cache errors convert through `searchcache_core::Error`; these cover the
//! outbound search path.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use searchcache_client::SearchError;

/// Errors raised by the `web_search` tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid input parameters (e.g., empty query, unknown depth).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Missing or rejected API key.
    #[error("SEARCH_AUTH_ERROR: {0}")]
    AuthError(String),

    /// The search API refused the request for quota reasons.
    #[error("SEARCH_RATE_LIMITED: {0}")]
    RateLimited(String),

    /// Any other outbound failure.
    #[error("SEARCH_FAILED: {0}")]
    SearchFailed(String),
}

impl From<SearchError> for ToolError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidQuery(msg) => ToolError::InvalidInput(msg),
            SearchError::InvalidMaxResults => ToolError::InvalidInput(err.to_string()),
            SearchError::MissingApiKey | SearchError::AuthError => ToolError::AuthError(err.to_string()),
            SearchError::RateLimited => ToolError::RateLimited(err.to_string()),
            _ => ToolError::SearchFailed(err.to_string()),
        }
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let code = match &err {
            ToolError::InvalidInput(_) => -32602,
            ToolError::AuthError(_) => -32010,
            ToolError::RateLimited(_) => -32011,
            ToolError::SearchFailed(_) => -32000,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
