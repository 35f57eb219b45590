//! web_search tool implementation.
//!
//! Performs web searches through the cache gateway: a cached record for the
//! query is returned as-is, otherwise the Tavily API is called and the payload
//! cached.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use searchcache_client::{CacheGateway, IncludeAnswer, SearchDepth, SearchProvider, SearchRequest, result_count};
use searchcache_core::ResultStore;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Search query (required).
    pub query: String,

    /// Number of results (1-20, default 10).
    #[serde(default)]
    pub max_results: Option<u8>,

    /// Search depth: basic (default) or advanced.
    #[serde(default)]
    pub search_depth: Option<String>,

    /// Include the cleaned page content of each result.
    #[serde(default)]
    pub include_raw_content: bool,

    /// Only return results from these domains.
    #[serde(default)]
    pub include_domains: Option<Vec<String>>,

    /// Never return results from these domains.
    #[serde(default)]
    pub exclude_domains: Option<Vec<String>>,

    /// Generated answer: off (default), basic, advanced.
    #[serde(default)]
    pub include_answer: Option<String>,

    /// Force a refresh, bypassing the cache.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchOutput {
    /// Original query string.
    pub query: String,
    /// Number of entries in `payload.results`.
    pub result_count: usize,
    /// Debug information.
    pub debug: DebugInfo,
    /// The search API response, unmodified.
    pub payload: serde_json::Value,
}

/// Debug information.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DebugInfo {
    /// Cache hit status.
    pub cache_hit: bool,
    /// Identifier of the cached record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// When the cached record was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<String>,
}

impl WebSearchParams {
    fn to_request(&self) -> Result<SearchRequest, ToolError> {
        let search_depth = match self.search_depth.as_deref() {
            Some(depth) => depth.parse::<SearchDepth>().map_err(ToolError::InvalidInput)?,
            None => SearchDepth::default(),
        };
        let include_answer = match self.include_answer.as_deref() {
            Some(mode) => mode.parse::<IncludeAnswer>().map_err(ToolError::InvalidInput)?,
            None => IncludeAnswer::default(),
        };

        let defaults = SearchRequest::default();
        Ok(SearchRequest {
            query: self.query.clone(),
            max_results: self.max_results.unwrap_or(defaults.max_results),
            search_depth,
            include_raw: self.include_raw_content,
            include_domains: self.include_domains.clone().unwrap_or_default(),
            exclude_domains: self.exclude_domains.clone().unwrap_or_default(),
            include_answer,
        })
    }
}

/// Implementation of the web_search tool.
pub async fn search_impl<S, P>(gateway: &CacheGateway<S, P>, params: WebSearchParams) -> Result<CallToolResult, McpError>
where
    S: ResultStore + ?Sized,
    P: SearchProvider,
{
    let req = params.to_request()?;

    let response = gateway
        .search_with(&req, params.force_refresh)
        .await
        .map_err(ToolError::from)?;

    let output = WebSearchOutput {
        query: req.query,
        result_count: result_count(&response.payload),
        debug: DebugInfo { cache_hit: response.cache_hit, record_id: response.record_id, cached_at: response.cached_at },
        payload: response.payload,
    };

    json_result(&output)
}
