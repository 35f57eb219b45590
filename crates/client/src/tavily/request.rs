//! Search request types and validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::SearchError;

/// Longest accepted query, in characters.
const MAX_QUERY_CHARS: usize = 400;

/// Search request parameters, serialized as the Tavily `/search` body.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    /// Search query (required, max 400 chars).
    pub query: String,

    /// Number of results (1-20, default 10).
    pub max_results: u8,

    /// Search depth: basic (faster) or advanced (more thorough).
    pub search_depth: SearchDepth,

    /// Include the cleaned page content of each result.
    #[serde(rename = "include_raw_content")]
    pub include_raw: bool,

    /// Restrict results to these domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,

    /// Drop results from these domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,

    /// Ask the API for a generated answer alongside the results.
    pub include_answer: IncludeAnswer,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_results: 10,
            search_depth: SearchDepth::Basic,
            include_raw: false,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
            include_answer: IncludeAnswer::Off,
        }
    }
}

/// Search depth levels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    #[serde(alias = "comprehensive")]
    Advanced,
}

impl FromStr for SearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" | "comprehensive" => Ok(SearchDepth::Advanced),
            other => Err(format!("invalid search depth '{other}': expected basic or advanced")),
        }
    }
}

impl fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        })
    }
}

/// Generated-answer levels. Serialized as `false`, `"basic"` or `"advanced"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IncludeAnswer {
    #[default]
    Off,
    Basic,
    Advanced,
}

impl Serialize for IncludeAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IncludeAnswer::Off => serializer.serialize_bool(false),
            IncludeAnswer::Basic => serializer.serialize_str("basic"),
            IncludeAnswer::Advanced => serializer.serialize_str("advanced"),
        }
    }
}

impl FromStr for IncludeAnswer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "false" | "none" => Ok(IncludeAnswer::Off),
            "basic" | "true" => Ok(IncludeAnswer::Basic),
            "advanced" => Ok(IncludeAnswer::Advanced),
            other => Err(format!("invalid answer mode '{other}': expected off, basic or advanced")),
        }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Default::default() }
    }

    /// Validate the search request parameters.
    ///
    /// Returns an error if any parameters are out of range or malformed.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query cannot be empty".to_string()));
        }

        let chars = self.query.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(SearchError::InvalidQuery(format!(
                "query too long: {chars} chars (max {MAX_QUERY_CHARS})"
            )));
        }

        if !(1..=20).contains(&self.max_results) {
            return Err(SearchError::InvalidMaxResults);
        }

        if let Some(domain) = self
            .include_domains
            .iter()
            .chain(&self.exclude_domains)
            .find(|d| d.trim().is_empty() || d.contains(char::is_whitespace))
        {
            return Err(SearchError::InvalidQuery(format!("invalid domain filter: '{domain}'")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let req = SearchRequest { max_results: 5, ..SearchRequest::new("test query") };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_query() {
        assert!(SearchRequest::new("").validate().is_err());
        assert!(SearchRequest::new("   ").validate().is_err());
    }

    #[test]
    fn test_query_too_long() {
        let req = SearchRequest::new("a".repeat(401));
        assert!(matches!(req.validate(), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_invalid_max_results() {
        let req = SearchRequest { max_results: 0, ..SearchRequest::new("test") };
        assert!(matches!(req.validate(), Err(SearchError::InvalidMaxResults)));

        let req = SearchRequest { max_results: 21, ..SearchRequest::new("test") };
        assert!(matches!(req.validate(), Err(SearchError::InvalidMaxResults)));
    }

    #[test]
    fn test_invalid_domain_filter() {
        let req = SearchRequest { exclude_domains: vec!["bad domain".into()], ..SearchRequest::new("test") };
        assert!(matches!(req.validate(), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_request_body() {
        let req = SearchRequest {
            include_domains: vec!["rust-lang.org".into()],
            include_answer: IncludeAnswer::Advanced,
            search_depth: SearchDepth::Advanced,
            ..SearchRequest::new("rust")
        };
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["query"], "rust");
        assert_eq!(body["max_results"], 10);
        assert_eq!(body["search_depth"], "advanced");
        assert_eq!(body["include_raw_content"], false);
        assert_eq!(body["include_answer"], "advanced");
        assert_eq!(body["include_domains"][0], "rust-lang.org");
        assert!(body.get("exclude_domains").is_none());
    }

    #[test]
    fn test_include_answer_off_is_false() {
        let body = serde_json::to_value(SearchRequest::new("rust")).unwrap();
        assert_eq!(body["include_answer"], false);
    }

    #[test]
    fn test_parse_depth_and_answer() {
        assert_eq!("comprehensive".parse::<SearchDepth>().unwrap(), SearchDepth::Advanced);
        assert_eq!("Basic".parse::<SearchDepth>().unwrap(), SearchDepth::Basic);
        assert!("deep".parse::<SearchDepth>().is_err());

        assert_eq!("advanced".parse::<IncludeAnswer>().unwrap(), IncludeAnswer::Advanced);
        assert_eq!("false".parse::<IncludeAnswer>().unwrap(), IncludeAnswer::Off);
        assert!("maybe".parse::<IncludeAnswer>().is_err());
    }

    #[test]
    fn test_deserialize_depth_alias() {
        let depth: SearchDepth = serde_json::from_str(r#""comprehensive""#).unwrap();
        assert_eq!(depth, SearchDepth::Advanced);
    }
}
