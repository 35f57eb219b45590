//! cache_list tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use searchcache_core::cache::DEFAULT_LIST_LIMIT;
use searchcache_core::{ListedRecord, ResultStore};
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Largest page a single call may request.
const MAX_LIST_LIMIT: usize = 100;

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// Page size (default 10, max 100).
    #[serde(default)]
    pub limit: Option<usize>,

    /// Records to skip, oldest first.
    #[serde(default)]
    pub offset: Option<usize>,

    /// Only list records saved for this query (matched by slug).
    #[serde(default)]
    pub query: Option<String>,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    pub count: usize,
    pub records: Vec<ListedRecord>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl<S: ResultStore + ?Sized>(store: &S, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let records = store.list(limit, offset, params.query.as_deref()).await?;

    json_result(&CacheListOutput { count: records.len(), records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::text_of;
    use searchcache_core::{CacheStore, SqliteBackend};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_filtered_and_paged() {
        let store = CacheStore::new(SqliteBackend::open_in_memory().await.unwrap(), "test-web-search:", 1);
        store.save("alpha", &json!({"n": 1})).await.unwrap();
        store.save("beta", &json!({"n": 2})).await.unwrap();
        store.save("gamma", &json!({"n": 3})).await.unwrap();

        let all = text_of(&list_impl(&store, CacheListParams::default()).await.unwrap());
        assert_eq!(all["count"], 3);
        assert_eq!(all["records"][0]["query"], "alpha");
        assert!(all["records"][0]["id"].as_str().unwrap().ends_with("_alpha"));

        let params = CacheListParams { limit: Some(1), offset: Some(1), query: None };
        let page = text_of(&list_impl(&store, params).await.unwrap());
        assert_eq!(page["count"], 1);
        assert_eq!(page["records"][0]["query"], "beta");

        let params = CacheListParams { query: Some("Gamma".into()), ..Default::default() };
        let filtered = text_of(&list_impl(&store, params).await.unwrap());
        assert_eq!(filtered["count"], 1);
        assert_eq!(filtered["records"][0]["results"]["n"], 3);
    }
}
