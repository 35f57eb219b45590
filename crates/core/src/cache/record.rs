//! Cached result records and their JSON wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cached search result.
///
/// Serialized as `{"query": ..., "timestamp": ..., "results": ...}`. The
/// payload is whatever the search provider returned and is never validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ResultRecord {
    /// Original query text, unmodified.
    pub query: String,
    /// Creation time, RFC 3339.
    pub timestamp: String,
    /// Opaque result payload.
    pub results: Value,
}

/// Borrowed form used when writing, so saving never clones the payload.
#[derive(Serialize)]
struct RecordRef<'a> {
    query: &'a str,
    timestamp: String,
    results: &'a Value,
}

impl ResultRecord {
    /// Encode a record for storage without taking ownership of the payload.
    pub fn encode(query: &str, created_at: &DateTime<Utc>, results: &Value) -> Result<String, serde_json::Error> {
        serde_json::to_string(&RecordRef { query, timestamp: created_at.to_rfc3339(), results })
    }

    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Creation time, if the stored timestamp parses.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// A record tagged with its identifier, as returned by listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListedRecord {
    pub id: String,
    #[serde(flatten)]
    pub record: ResultRecord,
}
