//! cache_get tool implementation.
//!
//! Retrieves a cached record by identifier. Reading a record restarts its TTL.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use searchcache_core::cache::{Backend, KeyTtl};
use searchcache_core::{CacheStore, Error, ResultRecord, ResultStore};
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Identifier of the cached record, e.g. `20240101-120000_rust-async`.
    pub id: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub id: String,
    /// The cached record.
    pub record: ResultRecord,
    /// Seconds until the record expires; absent when it never expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<u64>,
}

/// Implementation of the cache_get tool.
pub async fn get_impl<B: Backend>(store: &CacheStore<B>, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    if params.id.trim().is_empty() {
        return Err(Error::InvalidInput("id cannot be empty".into()).into());
    }

    let record = store
        .fetch(&params.id)
        .await?
        .ok_or_else(|| Error::CacheMiss(params.id.clone()))?;

    let expires_in_seconds = match store.ttl(&params.id).await? {
        KeyTtl::Expires(secs) => Some(secs),
        KeyTtl::Persistent | KeyTtl::Missing => None,
    };

    json_result(&CacheGetOutput { id: params.id, record, expires_in_seconds })
}
