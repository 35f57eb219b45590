//! Time-ordered identifier indices.
//!
//! A `TimeIndex` is a view over one sorted set whose scores are insertion
//! times in epoch seconds. The store keeps a global index plus one per
//! distinct query slug.

use chrono::{DateTime, Utc};

use super::backend::SortedIndexBackend;
use crate::Error;

/// Seconds in one day, used for TTL and eviction arithmetic.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Score for an insertion at `at`: epoch seconds with microsecond fraction.
pub fn score_at(at: &DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

/// Score boundary for "older than `days` days" relative to `now`.
pub fn cutoff_score(now: &DateTime<Utc>, days: u32) -> f64 {
    score_at(now) - (u64::from(days) * SECONDS_PER_DAY) as f64
}

/// One scored index bound to a backend.
pub struct TimeIndex<'a, B: ?Sized> {
    backend: &'a B,
    key: String,
}

impl<'a, B: SortedIndexBackend + ?Sized> TimeIndex<'a, B> {
    pub fn new(backend: &'a B, key: String) -> Self {
        Self { backend, key }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn add(&self, identifier: &str, score: f64) -> Result<(), Error> {
        self.backend.add_scored(&self.key, &[(identifier, score)]).await
    }

    /// Identifiers with `min <= score <= max`, oldest first.
    pub async fn range(&self, min: f64, max: f64) -> Result<Vec<String>, Error> {
        self.backend.range_by_score(&self.key, min, max).await
    }

    /// Every identifier in the index, oldest first.
    pub async fn all(&self) -> Result<Vec<String>, Error> {
        self.range(0.0, f64::INFINITY).await
    }

    /// Identifiers inserted at or before `cutoff`.
    pub async fn older_than(&self, cutoff: f64) -> Result<Vec<String>, Error> {
        self.range(0.0, cutoff).await
    }

    pub async fn remove(&self, identifiers: &[&str]) -> Result<u64, Error> {
        if identifiers.is_empty() {
            return Ok(0);
        }
        self.backend.remove_members(&self.key, identifiers).await
    }
}
