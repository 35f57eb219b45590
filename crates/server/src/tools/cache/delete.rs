//! cache_delete tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use searchcache_core::{Error, ResultStore};
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteParams {
    /// Identifier of the record to delete.
    pub id: String,
}

/// Output from the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteOutput {
    pub id: String,
    /// False when no record existed under `id`.
    pub deleted: bool,
}

/// Implementation of the cache_delete tool.
pub async fn delete_impl<S: ResultStore + ?Sized>(
    store: &S, params: CacheDeleteParams,
) -> Result<CallToolResult, McpError> {
    if params.id.trim().is_empty() {
        return Err(Error::InvalidInput("id cannot be empty".into()).into());
    }

    let deleted = store.delete(&params.id).await?;
    if deleted {
        tracing::info!(id = %params.id, "deleted cached result");
    }

    json_result(&CacheDeleteOutput { id: params.id, deleted })
}
