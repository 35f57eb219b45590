//! Terminal rendering for command results.

use std::io::{self, Write};

use searchcache_client::{GatewayResponse, answer, result_count, summaries, truncate};
use searchcache_core::ListedRecord;

/// Results shown inline after a search.
const TOP_RESULTS: usize = 3;

/// Content longer than this is cut for display.
const CONTENT_PREVIEW_CHARS: usize = 200;

pub fn render_search(out: &mut impl Write, query: &str, response: &GatewayResponse) -> io::Result<()> {
    let count = result_count(&response.payload);
    writeln!(out, "Found {count} results for query: '{query}'")?;

    match (&response.record_id, response.cache_hit) {
        (Some(id), true) => {
            let saved = response.cached_at.as_deref().unwrap_or("unknown time");
            writeln!(out, "Served from cache: {id} (saved {saved})")?;
        }
        (Some(id), false) => writeln!(out, "Results cached as: {id}")?,
        (None, _) => writeln!(out, "Results could not be cached")?,
    }

    if let Some(text) = answer(&response.payload) {
        writeln!(out, "\nAnswer: {text}")?;
    }

    if count == 0 {
        return Ok(());
    }

    writeln!(out, "\nTop results:")?;
    for summary in summaries(&response.payload).into_iter().take(TOP_RESULTS) {
        writeln!(out, "\n{}. {}", summary.rank, summary.title)?;
        writeln!(out, "   {}", summary.url)?;
        if let Some(content) = &summary.content {
            writeln!(out, "   {}", truncate(content, CONTENT_PREVIEW_CHARS))?;
        }
    }

    if count > TOP_RESULTS {
        writeln!(out, "\n... and {} more results in the cached record.", count - TOP_RESULTS)?;
    }
    Ok(())
}

pub fn render_list(out: &mut impl Write, records: &[ListedRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No cached results.");
    }
    for listed in records {
        writeln!(
            out,
            "{}  {}  {} ({} results)",
            listed.id,
            listed.record.timestamp,
            listed.record.query,
            result_count(&listed.record.results)
        )?;
    }
    Ok(())
}
