//! Storage backend capabilities consumed by the cache store.
//!
//! Each call is expected to be atomic on its own. Sequences of calls are not,
//! and the store does not try to make them so.

use async_trait::async_trait;

use crate::Error;

/// Remaining lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist (or has already expired).
    Missing,
    /// The key exists and never expires.
    Persistent,
    /// The key expires in this many seconds.
    Expires(u64),
}

/// Byte-string storage with optional per-key expiry.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Read a live value.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write a value, replacing any previous one and its expiry.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<(), Error>;

    /// Remove a key, returning the number of live keys removed.
    async fn delete(&self, key: &str) -> Result<u64, Error>;

    /// Reset the expiry of a live key. Returns false if the key is absent.
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<bool, Error>;

    async fn ttl(&self, key: &str) -> Result<KeyTtl, Error>;
}

/// Scored sets ordered by a floating point score.
#[async_trait]
pub trait SortedIndexBackend: Send + Sync {
    /// Insert or re-score members.
    async fn add_scored(&self, index: &str, entries: &[(&str, f64)]) -> Result<(), Error>;

    /// Members with `min <= score <= max`, ascending by score then member.
    ///
    /// `max` may be `f64::INFINITY`.
    async fn range_by_score(&self, index: &str, min: f64, max: f64) -> Result<Vec<String>, Error>;

    /// Remove members, returning how many were present.
    async fn remove_members(&self, index: &str, members: &[&str]) -> Result<u64, Error>;
}

/// A backend offering both capabilities.
pub trait Backend: KeyValueBackend + SortedIndexBackend {}

impl<T: KeyValueBackend + SortedIndexBackend> Backend for T {}
