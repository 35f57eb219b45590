//! cache_evict tool implementation.
//!
//! Removes records older than a given age. Unlike the sweep the CLI runs
//! before searching, backend failures are reported to the caller.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use searchcache_core::cache::Backend;
use searchcache_core::CacheStore;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_evict tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheEvictParams {
    /// Evict records older than this many days (default: configured retention).
    /// 0 evicts everything.
    #[serde(default)]
    pub older_than_days: Option<u32>,
}

/// Output from the cache_evict tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheEvictOutput {
    /// Number of records deleted.
    pub evicted: usize,
    pub older_than_days: u32,
}

/// Implementation of the cache_evict tool.
pub async fn evict_impl<B: Backend>(
    store: &CacheStore<B>, default_days: u32, params: CacheEvictParams,
) -> Result<CallToolResult, McpError> {
    let older_than_days = params.older_than_days.unwrap_or(default_days);
    let evicted = store.try_evict(older_than_days).await?;

    json_result(&CacheEvictOutput { evicted, older_than_days })
}
