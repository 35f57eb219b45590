//! Query-result cache backed by time-ordered indices.
//!
//! Records are addressed by an identifier derived from their creation time
//! and query slug. A global index and one index per query slug order them by
//! insertion time, which drives pagination, per-query lookup and eviction.
//!
//! - Slug-derived keys (`keys`)
//! - JSON records with timestamp metadata (`record`)
//! - Scored indices (`index`) over a pluggable backend (`backend`)
//! - SQLite backend with automatic migrations and TTL enforcement (`sqlite`)

pub mod backend;
pub mod index;
pub mod keys;
pub mod migrations;
pub mod record;
pub mod sqlite;
pub mod store;

pub use crate::Error;

pub use backend::{Backend, KeyTtl, KeyValueBackend, SortedIndexBackend};
pub use index::TimeIndex;
pub use keys::{KeyCodec, KeyKind, identifier_slug, make_identifier, make_key, slugify};
pub use record::{ListedRecord, ResultRecord};
pub use sqlite::SqliteBackend;
pub use store::{CacheStore, DEFAULT_LIST_LIMIT, ResultStore};
