//! Cache-first search flow.
//!
//! A query is answered from the store when any record exists for it;
//! otherwise the provider is called and its payload saved. Store failures
//! never fail a search: a broken read is a miss, a broken write is skipped.

use std::sync::Arc;

use async_trait::async_trait;
use searchcache_core::ResultStore;
use serde::Serialize;
use serde_json::Value;

use crate::tavily::{SearchError, SearchRequest};

/// Outbound search capability.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError>;
}

#[async_trait]
impl<P: SearchProvider + ?Sized> SearchProvider for Arc<P> {
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        (**self).search(request).await
    }
}

/// An absent provider fails only when a search actually reaches it, so a
/// gateway built without credentials still serves cache hits.
#[async_trait]
impl<P: SearchProvider> SearchProvider for Option<P> {
    async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        match self {
            Some(provider) => provider.search(request).await,
            None => Err(SearchError::MissingApiKey),
        }
    }
}

/// Search payload plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayResponse {
    pub payload: Value,
    pub cache_hit: bool,
    /// Identifier of the cached record; `None` when a fresh payload could
    /// not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Creation timestamp of the record that served a hit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<String>,
}

pub struct CacheGateway<S: ?Sized, P> {
    store: Arc<S>,
    provider: P,
}

impl<S: ResultStore + ?Sized, P: SearchProvider> CacheGateway<S, P> {
    pub fn new(store: Arc<S>, provider: P) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Answer from cache when possible.
    pub async fn search(&self, request: &SearchRequest) -> Result<GatewayResponse, SearchError> {
        self.search_with(request, false).await
    }

    /// Like [`search`](Self::search); `force_refresh` skips the cache lookup
    /// but still saves the fresh payload.
    pub async fn search_with(&self, request: &SearchRequest, force_refresh: bool) -> Result<GatewayResponse, SearchError> {
        request.validate()?;

        if !force_refresh && let Some(hit) = self.lookup(&request.query).await {
            return Ok(hit);
        }

        let payload = self.provider.search(request).await?;

        let record_id = match self.store.save(&request.query, &payload).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(query = %request.query, "failed to cache search results: {}", e);
                None
            }
        };

        Ok(GatewayResponse { payload, cache_hit: false, record_id, cached_at: None })
    }

    async fn lookup(&self, query: &str) -> Option<GatewayResponse> {
        match self.store.list(1, 0, Some(query)).await {
            Ok(mut records) if !records.is_empty() => {
                let listed = records.swap_remove(0);
                tracing::debug!(%query, id = %listed.id, "cache hit");
                Some(GatewayResponse {
                    payload: listed.record.results,
                    cache_hit: true,
                    record_id: Some(listed.id),
                    cached_at: Some(listed.record.timestamp),
                })
            }
            Ok(_) => {
                tracing::debug!(%query, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(%query, "cache lookup failed, treating as miss: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchcache_core::{CacheStore, Error, ListedRecord, ResultRecord, SqliteBackend};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that counts calls and echoes the query.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for CountingProvider {
        async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!({
                "query": request.query,
                "results": [{"title": format!("call {n}"), "url": "https://example.com"}]
            }))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl SearchProvider for FailingProvider {
        async fn search(&self, _request: &SearchRequest) -> Result<Value, SearchError> {
            Err(SearchError::RateLimited)
        }
    }

    /// Store whose every operation fails.
    struct FailingStore;

    #[async_trait]
    impl ResultStore for FailingStore {
        async fn save(&self, _query: &str, _payload: &Value) -> Result<String, Error> {
            Err(Error::Backend("store offline".into()))
        }
        async fn fetch(&self, _identifier: &str) -> Result<Option<ResultRecord>, Error> {
            Err(Error::Backend("store offline".into()))
        }
        async fn list(&self, _limit: usize, _offset: usize, _query: Option<&str>) -> Result<Vec<ListedRecord>, Error> {
            Err(Error::Backend("store offline".into()))
        }
        async fn delete(&self, _identifier: &str) -> Result<bool, Error> {
            Err(Error::Backend("store offline".into()))
        }
        async fn evict(&self, _max_age_days: u32) -> usize {
            0
        }
    }

    async fn sqlite_gateway() -> CacheGateway<CacheStore<SqliteBackend>, CountingProvider> {
        let db = SqliteBackend::open_in_memory().await.unwrap();
        CacheGateway::new(Arc::new(CacheStore::new(db, "test-web-search:", 1)), CountingProvider::default())
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let gateway = sqlite_gateway().await;
        let req = SearchRequest::new("rust async");

        let first = gateway.search(&req).await.unwrap();
        assert!(!first.cache_hit);
        assert!(first.record_id.is_some());

        let second = gateway.search(&req).await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(second.record_id, first.record_id);
        assert_eq!(second.payload, first.payload);
        assert!(second.cached_at.is_some());

        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hit_matches_equivalent_query() {
        let gateway = sqlite_gateway().await;
        gateway.search(&SearchRequest::new("Rust Async!")).await.unwrap();

        let hit = gateway.search(&SearchRequest::new("rust   async")).await.unwrap();
        assert!(hit.cache_hit);
        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_latin_queries_do_not_share_records() {
        let gateway = sqlite_gateway().await;

        let tokyo = gateway.search(&SearchRequest::new("東京 天気")).await.unwrap();
        let moscow = gateway.search(&SearchRequest::new("москва погода")).await.unwrap();

        assert!(!moscow.cache_hit);
        assert_ne!(moscow.record_id, tokyo.record_id);
        assert_eq!(moscow.payload["query"], "москва погода");
        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 2);

        let again = gateway.search(&SearchRequest::new("東京 天気")).await.unwrap();
        assert!(again.cache_hit);
        assert_eq!(again.payload["query"], "東京 天気");
    }

    #[tokio::test]
    async fn test_absent_provider_serves_hits() {
        let db = SqliteBackend::open_in_memory().await.unwrap();
        let store = Arc::new(CacheStore::new(db, "t:", 1));
        store.save("cached", &json!({"results": []})).await.unwrap();
        let gateway = CacheGateway::new(store, None::<CountingProvider>);

        let hit = gateway.search(&SearchRequest::new("cached")).await.unwrap();
        assert!(hit.cache_hit);

        let err = gateway.search(&SearchRequest::new("uncached")).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingApiKey));
        let err = gateway.search_with(&SearchRequest::new("cached"), true).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_cache() {
        let gateway = sqlite_gateway().await;
        let req = SearchRequest::new("tokio");

        gateway.search(&req).await.unwrap();
        let refreshed = gateway.search_with(&req, true).await.unwrap();

        assert!(!refreshed.cache_hit);
        assert_eq!(refreshed.payload["results"][0]["title"], "call 2");
        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_provider() {
        let gateway = CacheGateway::new(Arc::new(FailingStore), CountingProvider::default());

        let response = gateway.search(&SearchRequest::new("rust")).await.unwrap();
        assert!(!response.cache_hit);
        assert!(response.record_id.is_none());
        assert_eq!(response.payload["query"], "rust");
        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let db = SqliteBackend::open_in_memory().await.unwrap();
        let store = Arc::new(CacheStore::new(db, "t:", 1));
        let gateway = CacheGateway::new(Arc::clone(&store), FailingProvider);

        let err = gateway.search(&SearchRequest::new("rust")).await.unwrap_err();
        assert!(matches!(err, SearchError::RateLimited));
        assert!(store.list(10, 0, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_skips_everything() {
        let gateway = sqlite_gateway().await;

        let err = gateway.search(&SearchRequest::new("  ")).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
        assert_eq!(gateway.provider().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dyn_store() {
        let db = SqliteBackend::open_in_memory().await.unwrap();
        let store: Arc<dyn ResultStore> = Arc::new(CacheStore::new(db, "t:", 1));
        let gateway = CacheGateway::new(store, Arc::new(CountingProvider::default()));

        assert!(!gateway.search(&SearchRequest::new("dyn")).await.unwrap().cache_hit);
        assert!(gateway.search(&SearchRequest::new("dyn")).await.unwrap().cache_hit);
    }
}
