//! Read-only views over search payloads.
//!
//! Payloads are cached and returned as opaque JSON; these helpers only pull
//! out the fields that display code needs and tolerate anything missing.

use serde::Serialize;
use serde_json::Value;

/// Display view of one search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// 1-indexed position in the payload.
    pub rank: usize,
}

fn results_array(payload: &Value) -> &[Value] {
    payload
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Number of entries in the payload's `results` array.
pub fn result_count(payload: &Value) -> usize {
    results_array(payload).len()
}

/// The generated answer, when one was requested and returned.
pub fn answer(payload: &Value) -> Option<&str> {
    payload.get("answer").and_then(Value::as_str).filter(|a| !a.is_empty())
}

/// Summaries of the payload's results in their original order.
pub fn summaries(payload: &Value) -> Vec<ResultSummary> {
    results_array(payload)
        .iter()
        .enumerate()
        .map(|(idx, r)| ResultSummary {
            title: r.get("title").and_then(Value::as_str).unwrap_or("No title").to_string(),
            url: r.get("url").and_then(Value::as_str).unwrap_or("No URL").to_string(),
            content: r.get("content").and_then(Value::as_str).map(str::to_string),
            score: r.get("score").and_then(Value::as_f64),
            rank: idx + 1,
        })
        .collect()
}

/// Shorten `text` to at most `max` chars, marking the cut with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXTURE_JSON: &str = r#"{
        "query": "test query",
        "answer": "Example is an illustrative domain.",
        "results": [
            {
                "title": "Example Domain",
                "url": "https://example.com",
                "content": "This domain is for use in illustrative examples",
                "score": 0.91
            },
            {
                "url": "https://test.com"
            }
        ],
        "response_time": 1.2
    }"#;

    #[test]
    fn test_summaries() {
        let payload: Value = serde_json::from_str(FIXTURE_JSON).unwrap();
        let summaries = summaries(&payload);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].title, "Example Domain");
        assert_eq!(summaries[0].score, Some(0.91));
        assert_eq!(summaries[0].rank, 1);

        assert_eq!(summaries[1].title, "No title");
        assert_eq!(summaries[1].url, "https://test.com");
        assert!(summaries[1].content.is_none());
        assert_eq!(summaries[1].rank, 2);
    }

    #[test]
    fn test_answer_and_count() {
        let payload: Value = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(result_count(&payload), 2);
        assert_eq!(answer(&payload), Some("Example is an illustrative domain."));

        let empty = json!({"answer": "", "results": "not-an-array"});
        assert_eq!(result_count(&empty), 0);
        assert!(answer(&empty).is_none());
        assert!(summaries(&json!(null)).is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 200), "short");
        let long = "x".repeat(250);
        let cut = truncate(&long, 200);
        assert_eq!(cut.chars().count(), 200);
        assert!(cut.ends_with("..."));
    }
}
