//! Command-line argument parsing for web-search.

use clap::{Args, Parser, Subcommand};
use searchcache_client::{IncludeAnswer, SearchDepth, SearchRequest};

/// Web search client with a local result cache.
///
/// Searches the web through the Tavily API. Repeated queries are answered
/// from the cache until their records expire.
#[derive(Parser, Debug)]
#[command(name = "web-search")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the web, serving repeated queries from the cache
    Search(SearchArgs),

    /// Print a cached record as JSON
    Get {
        /// Record identifier, e.g. 20240101-120000_rust-async
        id: String,
    },

    /// List cached records, oldest first
    List {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Only list records saved for this query
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Delete a cached record
    Delete { id: String },

    /// Delete records older than DAYS (0 deletes everything)
    Evict { days: u32 },
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// The search query string
    pub query: String,

    /// Maximum number of results to return (1-20)
    #[arg(short = 'n', long, default_value_t = 10)]
    pub max_results: u8,

    /// Search depth: basic is faster, advanced (or comprehensive) is more thorough
    #[arg(short, long, default_value = "basic")]
    pub depth: SearchDepth,

    /// Include raw page content in results
    #[arg(long)]
    pub raw: bool,

    /// Domain to include in search (can be used multiple times)
    #[arg(short, long = "include-domain", value_name = "DOMAIN")]
    pub include_domain: Vec<String>,

    /// Domain to exclude from search (can be used multiple times)
    #[arg(short, long = "exclude-domain", value_name = "DOMAIN")]
    pub exclude_domain: Vec<String>,

    /// Delete cached records older than this many days before searching
    /// (default: configured retention)
    #[arg(short, long)]
    pub retention_days: Option<u32>,

    /// Ask for a generated answer alongside the results
    #[arg(long)]
    pub answer: bool,

    /// Skip the cache lookup and always call the search API
    #[arg(long)]
    pub refresh: bool,
}

impl SearchArgs {
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            max_results: self.max_results,
            search_depth: self.depth,
            include_raw: self.raw,
            include_domains: self.include_domain.clone(),
            exclude_domains: self.exclude_domain.clone(),
            include_answer: if self.answer { IncludeAnswer::Basic } else { IncludeAnswer::Off },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_args(argv: &[&str]) -> SearchArgs {
        match Cli::parse_from(argv).command {
            Command::Search(args) => args,
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_search_defaults() {
        let args = search_args(&["web-search", "search", "rust async"]);
        assert_eq!(args.query, "rust async");
        assert_eq!(args.max_results, 10);
        assert_eq!(args.depth, SearchDepth::Basic);
        assert!(args.retention_days.is_none());
        assert!(!args.refresh);
    }

    #[test]
    fn test_search_flags() {
        let args = search_args(&[
            "web-search",
            "search",
            "rust",
            "-n",
            "5",
            "-d",
            "comprehensive",
            "-i",
            "rust-lang.org",
            "-i",
            "docs.rs",
            "-e",
            "example.com",
            "-r",
            "7",
            "--raw",
            "--answer",
        ]);
        let req = args.to_request();

        assert_eq!(req.max_results, 5);
        assert_eq!(req.search_depth, SearchDepth::Advanced);
        assert_eq!(req.include_domains, vec!["rust-lang.org".to_string(), "docs.rs".to_string()]);
        assert_eq!(req.exclude_domains, vec!["example.com".to_string()]);
        assert!(req.include_raw);
        assert_eq!(req.include_answer, IncludeAnswer::Basic);
        assert_eq!(args.retention_days, Some(7));
    }

    #[test]
    fn test_invalid_depth_rejected() {
        assert!(Cli::try_parse_from(["web-search", "search", "rust", "-d", "deep"]).is_err());
    }

    #[test]
    fn test_list_args() {
        let cli = Cli::parse_from(["web-search", "list", "--limit", "3", "--query", "rust"]);
        match cli.command {
            Command::List { limit, offset, query } => {
                assert_eq!(limit, 3);
                assert_eq!(offset, 0);
                assert_eq!(query.as_deref(), Some("rust"));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
