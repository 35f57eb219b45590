//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and pruning the result cache.

pub mod delete;
pub mod evict;
pub mod get;
pub mod list;

pub use delete::{CacheDeleteParams, delete_impl};
pub use evict::{CacheEvictParams, evict_impl};
pub use get::{CacheGetParams, get_impl};
pub use list::{CacheListParams, list_impl};
