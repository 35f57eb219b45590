//! Tavily Search API client.
//!
//! Provides a client for the Tavily search endpoint with request validation
//! and a minimum request interval.
//!
//! ### Protocol
//!
//! - **Endpoint**: `POST https://api.tavily.com/search`
//! - **Authentication**: `Authorization: Bearer <key>` header.
//! - **Rate Limiting**: requests are spaced by a fixed minimum interval.
//! - **Payload**: the JSON response object is returned untouched so it can be
//!   cached and replayed as-is.

pub mod error;
pub mod request;
pub mod response;

pub use error::SearchError;
pub use request::{IncludeAnswer, SearchDepth, SearchRequest};
pub use response::{ResultSummary, answer, result_count, summaries, truncate};

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use searchcache_core::AppConfig;
use url::Url;

use crate::gateway::SearchProvider;

/// Default base URL for the Tavily API.
const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "search-cache/0.1";

/// Minimum interval between requests (100 requests per minute).
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(600);

/// Search client configuration.
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    /// API key from TAVILY_API_KEY env var.
    pub api_key: String,
    /// Base URL (default: https://api.tavily.com).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: search-cache/0.x).
    pub user_agent: String,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl TavilyConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads TAVILY_API_KEY from environment. Returns error if not set.
    pub fn from_env() -> Result<Self, SearchError> {
        let api_key = std::env::var("TAVILY_API_KEY").map_err(|_| SearchError::MissingApiKey)?;

        Ok(Self { api_key, ..Default::default() })
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Tavily Search API client.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    endpoint: Url,
    config: TavilyConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl TavilyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TavilyConfig) -> Result<Self, SearchError> {
        if config.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let endpoint = Url::parse(&format!("{}/search", config.base_url.trim_end_matches('/')))
            .map_err(|e| SearchError::InvalidConfig(format!("base_url: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::Network(Arc::new(e)))?;

        Ok(Self { http, endpoint, config, rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)) })
    }

    /// Create a new client from environment variables.
    pub fn from_env() -> Result<Self, SearchError> {
        Self::new(TavilyConfig::from_env()?)
    }

    /// Create a new client from the layered application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        let api_key = config.require_api_key().map_err(|_| SearchError::MissingApiKey)?;
        Self::new(TavilyConfig {
            api_key: api_key.to_string(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute a web search query.
    ///
    /// Handles rate limiting and request validation. The response object is
    /// returned without normalization.
    pub async fn search(&self, req: &SearchRequest) -> Result<Value, SearchError> {
        req.validate()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        tracing::info!(query = %req.query, max_results = req.max_results, depth = %req.search_depth, "searching");

        let http_response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("search API response status: {}", status);

        if let Some(err) = SearchError::from_status(status) {
            return Err(err);
        }

        let bytes = http_response.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes).map_err(|e| SearchError::Parse(e.to_string()))?;

        if !payload.is_object() {
            return Err(SearchError::Parse("expected a JSON object".to_string()));
        }
        if payload.get("results").is_none() {
            tracing::warn!("no results field in search API response");
        }

        tracing::debug!("search completed in {:?}, {} results", start.elapsed(), result_count(&payload));

        Ok(payload)
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        TavilyClient::search(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_missing_key() {
        let original = std::env::var("TAVILY_API_KEY").ok();
        unsafe {
            std::env::remove_var("TAVILY_API_KEY");
        }

        let result = TavilyConfig::from_env();
        assert!(matches!(result, Err(SearchError::MissingApiKey)));

        if let Some(key) = original {
            unsafe {
                std::env::set_var("TAVILY_API_KEY", key);
            }
        }
    }

    #[test]
    fn test_client_new_missing_key() {
        let config = TavilyConfig::default();
        let result = TavilyClient::new(config);
        assert!(matches!(result, Err(SearchError::MissingApiKey)));
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let config = TavilyConfig { api_key: "tvly-test".into(), base_url: "http://localhost:8080/".into(), ..Default::default() };
        let client = TavilyClient::new(config).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8080/search");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = TavilyConfig { api_key: "tvly-test".into(), base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(TavilyClient::new(config), Err(SearchError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig { api_key: Some("tvly-test".into()), ..Default::default() };
        let client = TavilyClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://api.tavily.com/search");

        let config = AppConfig { api_key: Some(String::new()), ..Default::default() };
        assert!(matches!(TavilyClient::from_config(&config), Err(SearchError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_request() {
        let config = TavilyConfig { api_key: "tvly-test".into(), ..Default::default() };
        let client = TavilyClient::new(config).unwrap();
        let result = client.search(&SearchRequest::new("")).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));
    }
}
