//! Client code for search-cache.
//!
//! This crate provides the Tavily search client and the cache-first gateway
//! shared by the server and CLI.

pub mod gateway;
pub mod tavily;

pub use gateway::{CacheGateway, GatewayResponse, SearchProvider};
pub use tavily::{
    IncludeAnswer, ResultSummary, SearchDepth, SearchError, SearchRequest, TavilyClient, TavilyConfig, answer,
    result_count, summaries, truncate,
};
