//! web-search command-line client.
//!
//! Thin front end over the cache store and the cache-first search gateway.

pub mod cli;
pub mod commands;
pub mod output;
