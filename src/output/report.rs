//! Rendering of crawl outcomes for the terminal

use crate::crawler::{CrawlOutcome, MatchRecord, SkippedBranch};
use crate::url::Address;
use serde::Serialize;
use std::fmt::Write;

/// Serializable view of a [`CrawlOutcome`]
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport<'a> {
    pub found: bool,
    pub depth_reached: u32,
    pub timed_out: bool,
    #[serde(rename = "match")]
    pub matched: Option<&'a MatchRecord>,
    pub pages_visited: usize,
    pub visited: &'a [Address],
    pub skipped: &'a [SkippedBranch],
}

impl<'a> From<&'a CrawlOutcome> for OutcomeReport<'a> {
    fn from(outcome: &'a CrawlOutcome) -> Self {
        Self {
            found: outcome.found(),
            depth_reached: outcome.depth_reached,
            timed_out: outcome.timed_out,
            matched: outcome.matched.as_ref(),
            pages_visited: outcome.visited.len(),
            visited: &outcome.visited,
            skipped: &outcome.skipped,
        }
    }
}

/// Renders the outcome as pretty-printed JSON
pub fn render_json(outcome: &CrawlOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&OutcomeReport::from(outcome))
}

/// Renders a human-readable summary of the outcome
pub fn render_text(outcome: &CrawlOutcome) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = write_summary(&mut out, outcome);

    out
}

fn write_summary(out: &mut String, outcome: &CrawlOutcome) -> std::fmt::Result {
    writeln!(out, "=== Crawl Result ===")?;
    writeln!(out)?;

    match &outcome.matched {
        Some(found) => {
            writeln!(out, "Match found:")?;
            writeln!(out, "  Address: {}", found.address)?;
            if !found.title.is_empty() {
                writeln!(out, "  Title: {}", found.title)?;
            }
            writeln!(out, "  Occurrences: {}", found.match_count)?;
        }
        None if outcome.timed_out => {
            writeln!(out, "No match found before the run timeout.")?;
        }
        None => {
            writeln!(out, "No match found.")?;
        }
    }
    writeln!(out)?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Pages visited: {}", outcome.visited.len())?;
    writeln!(out, "  Depth reached: {}", outcome.depth_reached)?;
    writeln!(out, "  Branches skipped: {}", outcome.skipped.len())?;

    if !outcome.skipped.is_empty() {
        writeln!(out)?;
        writeln!(out, "Skipped Branches ({}):", outcome.skipped.len())?;
        for branch in &outcome.skipped {
            writeln!(
                out,
                "  - {} (depth {}): {}",
                branch.address, branch.depth, branch.error
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchError;

    fn address(path: &str) -> Address {
        Address::parse(&format!("https://example.com/{}", path)).unwrap()
    }

    fn found_outcome() -> CrawlOutcome {
        CrawlOutcome {
            depth_reached: 1,
            visited: vec![address(""), address("hit")],
            matched: Some(MatchRecord {
                address: address("hit"),
                title: "Hit Page".to_string(),
                match_count: 4,
            }),
            skipped: vec![SkippedBranch {
                address: address("down"),
                depth: 1,
                error: FetchError::Http { status_code: 503 },
            }],
            timed_out: false,
        }
    }

    #[test]
    fn test_text_for_match() {
        let text = render_text(&found_outcome());
        assert!(text.contains("Match found:"));
        assert!(text.contains("Address: https://example.com/hit"));
        assert!(text.contains("Title: Hit Page"));
        assert!(text.contains("Occurrences: 4"));
        assert!(text.contains("Pages visited: 2"));
        assert!(text.contains("https://example.com/down (depth 1): HTTP status 503"));
    }

    #[test]
    fn test_text_for_miss() {
        let outcome = CrawlOutcome {
            visited: vec![address("")],
            ..CrawlOutcome::default()
        };
        let text = render_text(&outcome);
        assert!(text.contains("No match found."));
        assert!(!text.contains("Skipped Branches"));
    }

    #[test]
    fn test_text_for_timeout() {
        let outcome = CrawlOutcome {
            timed_out: true,
            ..CrawlOutcome::default()
        };
        assert!(render_text(&outcome).contains("before the run timeout"));
    }

    #[test]
    fn test_json_shape() {
        let json = render_json(&found_outcome()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["found"], true);
        assert_eq!(value["depth_reached"], 1);
        assert_eq!(value["pages_visited"], 2);
        assert_eq!(value["match"]["address"], "https://example.com/hit");
        assert_eq!(value["match"]["match_count"], 4);
        assert_eq!(value["visited"][1], "https://example.com/hit");
        assert_eq!(value["skipped"][0]["error"]["kind"], "http");
        assert_eq!(value["skipped"][0]["error"]["status_code"], 503);
    }

    #[test]
    fn test_json_without_match() {
        let json = render_json(&CrawlOutcome::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["found"], false);
        assert!(value["match"].is_null());
    }
}
