//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::cache::{
    CacheDeleteParams, CacheEvictParams, CacheGetParams, CacheListParams, delete_impl, evict_impl, get_impl, list_impl,
};
use crate::tools::web_search::{WebSearchParams, search_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use searchcache_client::{CacheGateway, TavilyClient};
use searchcache_core::{AppConfig, CacheStore, SqliteBackend};

pub type Store = CacheStore<SqliteBackend>;
/// Without a client, searches that miss the cache fail with a missing-key error.
pub type Gateway = CacheGateway<Store, Option<TavilyClient>>;

/// The main MCP server handler for mcp-search.
#[derive(Clone)]
pub struct McpSearchServer {
    tool_router: ToolRouter<Self>,
    store: Arc<Store>,
    gateway: Arc<Gateway>,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpSearchServer {
    /// Create a new server handler.
    pub fn new(store: Arc<Store>, client: Option<TavilyClient>, config: AppConfig) -> Self {
        let gateway = Arc::new(CacheGateway::new(Arc::clone(&store), client));
        Self { tool_router: Self::tool_router(), store, gateway, config: Arc::new(config) }
    }

    /// Search the web, answering from the cache when a record for the query exists.
    #[tool(
        description = "Search the web via Tavily. Results for a previously seen query are served from the local cache unless force_refresh is set."
    )]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(self.gateway.as_ref(), params.0).await
    }

    #[tool(description = "Retrieve a cached search record by id, with its remaining time-to-live.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(self.store.as_ref(), params.0).await
    }

    #[tool(description = "List cached search records oldest first, optionally filtered by query.")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(self.store.as_ref(), params.0).await
    }

    #[tool(description = "Delete a cached search record by id.")]
    async fn cache_delete(&self, params: Parameters<CacheDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(self.store.as_ref(), params.0).await
    }

    #[tool(description = "Evict cached search records older than the given number of days.")]
    async fn cache_evict(&self, params: Parameters<CacheEvictParams>) -> Result<CallToolResult, McpError> {
        evict_impl(self.store.as_ref(), self.config.retention_days, params.0).await
    }
}

impl ServerHandler for McpSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-search".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
