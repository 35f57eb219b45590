//! Search API client error types.

use std::sync::Arc;

/// Errors from the remote search call.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No API key configured.
    #[error("missing API key: set WEB_SEARCH_API_KEY or TAVILY_API_KEY")]
    MissingApiKey,

    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid max_results parameter (must be 1-20).
    #[error("invalid max_results: must be 1-20")]
    InvalidMaxResults,

    /// Invalid client configuration (e.g., unparsable base URL).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited or over the plan's usage limit.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SearchError::Timeout } else { SearchError::Network(Arc::new(err)) }
    }
}

impl SearchError {
    /// Map an HTTP status to an error, or None for success.
    pub fn from_status(status: reqwest::StatusCode) -> Option<Self> {
        match status.as_u16() {
            401 | 403 => Some(SearchError::AuthError),
            // 432/433 are the plan and pay-as-you-go limit responses.
            429 | 432 | 433 => Some(SearchError::RateLimited),
            _ if status.is_client_error() || status.is_server_error() => {
                Some(SearchError::HttpError { status: status.as_u16() })
            }
            _ => None,
        }
    }
}
