//! Cache store: records plus their time indices over a backend.
//!
//! Write order keeps the index invariant: `save` writes the record before
//! either index, `delete` clears both indices before the record. Dangling
//! index entries left behind by backend expiry are pruned whenever a walk
//! finds their record missing.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::backend::{Backend, KeyTtl};
use super::index::{SECONDS_PER_DAY, TimeIndex, cutoff_score, score_at};
use super::keys::{KeyCodec, identifier_slug, make_identifier};
use super::record::{ListedRecord, ResultRecord};
use crate::{AppConfig, Error};

/// Page size used when callers do not specify one.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Storage capability consumed by the search flow.
///
/// `CacheStore` is the only production implementation; the trait exists so
/// callers can be exercised against substitutes.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist a payload for `query` and return its identifier.
    async fn save(&self, query: &str, payload: &Value) -> Result<String, Error>;

    /// Read a record, refreshing its TTL. Absent is `Ok(None)`.
    async fn fetch(&self, identifier: &str) -> Result<Option<ResultRecord>, Error>;

    /// Page through records oldest first, optionally restricted to one query.
    async fn list(&self, limit: usize, offset: usize, query: Option<&str>) -> Result<Vec<ListedRecord>, Error>;

    /// Remove a record and its index entries. False if it did not exist.
    async fn delete(&self, identifier: &str) -> Result<bool, Error>;

    /// Remove records older than `max_age_days`. Never fails; a backend
    /// failure is logged and reported as zero.
    async fn evict(&self, max_age_days: u32) -> usize;
}

/// Query-result cache over a key-value and sorted-index backend.
#[derive(Debug, Clone)]
pub struct CacheStore<B> {
    backend: B,
    keys: KeyCodec,
    ttl_days: u32,
}

impl<B: Backend> CacheStore<B> {
    /// Create a store. A `ttl_days` of 0 writes records without expiry.
    pub fn new(backend: B, prefix: impl Into<String>, ttl_days: u32) -> Self {
        Self { backend, keys: KeyCodec::new(prefix), ttl_days }
    }

    pub fn from_config(backend: B, config: &AppConfig) -> Self {
        Self::new(backend, config.prefix.clone(), config.ttl_days)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn keys(&self) -> &KeyCodec {
        &self.keys
    }

    pub fn ttl_days(&self) -> u32 {
        self.ttl_days
    }

    fn ttl_seconds(&self) -> Option<u64> {
        (self.ttl_days > 0).then(|| u64::from(self.ttl_days) * SECONDS_PER_DAY)
    }

    pub fn global_index(&self) -> TimeIndex<'_, B> {
        TimeIndex::new(&self.backend, self.keys.global_index())
    }

    pub fn query_index(&self, query: &str) -> TimeIndex<'_, B> {
        TimeIndex::new(&self.backend, self.keys.query_index(query))
    }

    /// Remaining lifetime of a record.
    pub async fn ttl(&self, identifier: &str) -> Result<KeyTtl, Error> {
        self.backend.ttl(&self.keys.result(identifier)).await
    }

    /// Strict form of [`ResultStore::evict`] that surfaces backend failures.
    ///
    /// Per-record delete failures are still logged and skipped.
    pub async fn try_evict(&self, max_age_days: u32) -> Result<usize, Error> {
        let cutoff = cutoff_score(&Utc::now(), max_age_days);
        let global = self.global_index();
        let candidates = global.older_than(cutoff).await?;

        let mut evicted = 0;
        let mut dangling = Vec::new();
        for identifier in candidates {
            match self.delete(&identifier).await {
                Ok(true) => evicted += 1,
                Ok(false) => dangling.push(identifier),
                Err(e) => tracing::warn!(%identifier, "failed to evict cached result: {}", e),
            }
        }

        if !dangling.is_empty() {
            self.prune_dangling(&global, &dangling).await;
        }

        if evicted > 0 {
            tracing::info!(evicted, max_age_days, "evicted old cached results");
        }
        Ok(evicted)
    }

    /// Per-query index an identifier was saved into, found through its slug.
    fn owning_index(&self, identifier: &str) -> Option<TimeIndex<'_, B>> {
        identifier_slug(identifier).map(|slug| TimeIndex::new(&self.backend, self.keys.slug_index(slug)))
    }

    /// Drop identifiers whose record is gone from every index that can hold
    /// them: the walked one, the global one and each identifier's own
    /// per-query index. Failures are logged and skipped.
    async fn prune_dangling(&self, walked: &TimeIndex<'_, B>, dangling: &[String]) {
        let members: Vec<&str> = dangling.iter().map(String::as_str).collect();
        let global = self.global_index();

        tracing::debug!(index = walked.key(), count = members.len(), "pruning dangling index entries");
        if let Err(e) = walked.remove(&members).await {
            tracing::warn!(index = walked.key(), "failed to prune index: {}", e);
        }
        if walked.key() != global.key()
            && let Err(e) = global.remove(&members).await
        {
            tracing::warn!(index = global.key(), "failed to prune index: {}", e);
        }

        for identifier in members {
            let Some(owner) = self.owning_index(identifier) else {
                continue;
            };
            if owner.key() == walked.key() {
                continue;
            }
            if let Err(e) = owner.remove(&[identifier]).await {
                tracing::warn!(index = owner.key(), "failed to prune index: {}", e);
            }
        }
    }
}

#[async_trait]
impl<B: Backend> ResultStore for CacheStore<B> {
    async fn save(&self, query: &str, payload: &Value) -> Result<String, Error> {
        let now = Utc::now();
        let identifier = make_identifier(&now, query);
        let raw = ResultRecord::encode(query, &now, payload)?;

        self.backend
            .set(&self.keys.result(&identifier), &raw, self.ttl_seconds())
            .await?;

        let score = score_at(&now);
        self.global_index().add(&identifier, score).await?;
        self.query_index(query).add(&identifier, score).await?;

        tracing::info!(%identifier, "cached search results");
        Ok(identifier)
    }

    async fn fetch(&self, identifier: &str) -> Result<Option<ResultRecord>, Error> {
        let key = self.keys.result(identifier);
        let Some(raw) = self.backend.get(&key).await? else {
            return Ok(None);
        };

        let record = ResultRecord::decode(&raw).map_err(|source| Error::MalformedRecord { key: key.clone(), source })?;

        if let Some(ttl) = self.ttl_seconds()
            && !self.backend.expire(&key, ttl).await?
        {
            tracing::debug!(%identifier, "record expired before its TTL could be refreshed");
        }

        Ok(Some(record))
    }

    async fn list(&self, limit: usize, offset: usize, query: Option<&str>) -> Result<Vec<ListedRecord>, Error> {
        let index = match query.filter(|q| !q.is_empty()) {
            Some(q) => self.query_index(q),
            None => self.global_index(),
        };

        // The backend has no offset scan; page over the full ascending range.
        let identifiers = index.all().await?;

        let mut records = Vec::new();
        let mut dangling = Vec::new();
        for id in identifiers.into_iter().skip(offset).take(limit) {
            match self.fetch(&id).await? {
                Some(record) => records.push(ListedRecord { id, record }),
                None => dangling.push(id),
            }
        }

        if !dangling.is_empty() {
            self.prune_dangling(&index, &dangling).await;
        }

        Ok(records)
    }

    async fn delete(&self, identifier: &str) -> Result<bool, Error> {
        let key = self.keys.result(identifier);
        let Some(raw) = self.backend.get(&key).await? else {
            return Ok(false);
        };

        let query_index = match ResultRecord::decode(&raw) {
            Ok(record) => Some(self.query_index(&record.query)),
            Err(e) => {
                tracing::warn!(%identifier, "deleting malformed record: {}", e);
                self.owning_index(identifier)
            }
        };

        self.global_index().remove(&[identifier]).await?;
        if let Some(index) = query_index {
            index.remove(&[identifier]).await?;
        }

        let removed = self.backend.delete(&key).await?;
        Ok(removed > 0)
    }

    async fn evict(&self, max_age_days: u32) -> usize {
        match self.try_evict(max_age_days).await {
            Ok(evicted) => evicted,
            Err(e) => {
                tracing::error!(max_age_days, "cache eviction failed: {}", e);
                0
            }
        }
    }
}
