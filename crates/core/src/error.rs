//! Unified error types for search-cache.
//!
//! Storage failures share the `STORAGE_ERROR` prefix so callers can treat the
//! whole class uniformly; "not found" is never an error at the store level.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the search cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No cached record found for the given identifier.
    #[error("CACHE_MISS: {0}")]
    CacheMiss(String),

    /// Database operation failed.
    #[error("STORAGE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORAGE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored record could not be decoded.
    #[error("STORAGE_ERROR: malformed record at {key}: {source}")]
    MalformedRecord { key: String, source: serde_json::Error },

    /// A record could not be encoded for storage.
    #[error("STORAGE_ERROR: failed to encode record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-level failure not tied to a specific driver.
    #[error("STORAGE_ERROR: {0}")]
    Backend(String),
}

impl Error {
    /// Whether this error belongs to the storage class.
    pub fn is_storage(&self) -> bool {
        !matches!(self, Error::InvalidInput(_) | Error::CacheMiss(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::CacheMiss(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::MalformedRecord { .. } | Error::Serialization(_) | Error::Backend(_) => (-32002, err.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CacheMiss("20240101-000000_rust".to_string());
        assert!(err.to_string().contains("CACHE_MISS"));
        assert!(err.to_string().contains("20240101-000000_rust"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::CacheMiss("abc".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);

        let err = Error::Backend("unreachable".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32002);
    }

    #[test]
    fn test_storage_class() {
        assert!(Error::Backend("down".into()).is_storage());
        assert!(Error::MigrationFailed("v1".into()).is_storage());
        assert!(!Error::InvalidInput("empty".into()).is_storage());
        assert!(!Error::CacheMiss("id".into()).is_storage());
    }
}
