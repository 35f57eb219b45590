//! Query-derived storage keys and record identifiers.

use chrono::{DateTime, Utc};

/// Maximum slug length in chars.
pub const MAX_SLUG_LEN: usize = 50;

/// Format of the timestamp half of a record identifier.
pub const IDENTIFIER_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

/// The kind tag embedded in every storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// A serialized result record.
    Result,
    /// The global time index.
    Index,
    /// A per-query time index.
    Query,
}

impl KeyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyKind::Result => "result",
            KeyKind::Index => "index",
            KeyKind::Query => "query",
        }
    }
}

/// Convert free text into a lowercase, key-safe slug.
///
/// Letters and digits of any script are kept; every other run of characters
/// collapses to a single hyphen. Edge hyphens are stripped and the result is
/// capped at [`MAX_SLUG_LEN`] chars. Never fails; empty or all-punctuation
/// input yields an empty slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if let Some((cut, _)) = slug.char_indices().nth(MAX_SLUG_LEN) {
        slug.truncate(cut);
    }
    let trimmed = slug.trim_end_matches('-').len();
    slug.truncate(trimmed);
    slug
}

/// Build a namespaced storage key: `{namespace}{kind}:{identifier}`.
pub fn make_key(namespace: &str, kind: KeyKind, identifier: &str) -> String {
    format!("{namespace}{}:{identifier}", kind.as_str())
}

/// Build a record identifier from its creation time and query.
pub fn make_identifier(created_at: &DateTime<Utc>, query: &str) -> String {
    format!("{}_{}", created_at.format(IDENTIFIER_TIME_FORMAT), slugify(query))
}

/// The slug half of a record identifier.
///
/// Slugs never contain `_`, so the first underscore separates the halves.
pub fn identifier_slug(identifier: &str) -> Option<&str> {
    identifier.split_once('_').map(|(_, slug)| slug)
}

/// Key builder bound to one namespace.
#[derive(Debug, Clone)]
pub struct KeyCodec {
    namespace: String,
}

impl KeyCodec {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self { namespace: namespace.into() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key of the serialized record for `identifier`.
    pub fn result(&self, identifier: &str) -> String {
        make_key(&self.namespace, KeyKind::Result, identifier)
    }

    /// Key of the global time index.
    pub fn global_index(&self) -> String {
        make_key(&self.namespace, KeyKind::Index, "all")
    }

    /// Key of the time index for `query`, after slugifying it.
    pub fn query_index(&self, query: &str) -> String {
        self.slug_index(&slugify(query))
    }

    /// Key of the time index for an already slugified query.
    pub fn slug_index(&self, slug: &str) -> String {
        make_key(&self.namespace, KeyKind::Query, slug)
    }
}
