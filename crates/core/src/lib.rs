//! Core types and shared functionality for search-cache.
//!
//! This crate provides:
//! - Query-result cache with a time-ordered index (SQLite backend)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStore, ListedRecord, ResultRecord, ResultStore, SqliteBackend};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
