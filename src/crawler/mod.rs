//! Crawler module for term-seeking traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] capability
//! - HTML parsing into title, body text and links
//! - Case-insensitive term matching
//! - The run-wide visited set
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod matcher;
mod parser;
mod visited;

pub use coordinator::{CrawlOutcome, Crawler, MatchRecord, SkippedBranch};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use matcher::SearchTerm;
pub use parser::{parse_html, Document, Extractor, HtmlExtractor};
pub use visited::VisitedSet;

use crate::config::Config;
use crate::SeekError;

/// Runs a complete crawl with the configured depth bound
///
/// This is the main entry point for a search. It will:
/// 1. Validate the term and seed
/// 2. Build the HTTP client
/// 3. Fetch the seed and expand its links concurrently
/// 4. Stop at the first page containing the term
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - Absolute HTTP(S) address to start from
/// * `term` - Text to look for
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl finished, with or without a match
/// * `Err(SeekError)` - Invalid input, or the seed could not be fetched
pub async fn crawl(config: &Config, seed: &str, term: &str) -> Result<CrawlOutcome, SeekError> {
    let crawler = Crawler::from_config(config)?;
    crawler.crawl(seed, term, config.crawler.max_depth).await
}
