//! Crawler coordinator - term-seeking crawl orchestration
//!
//! This module drives a crawl run:
//! - Depth bounding from the seed
//! - Run-wide deduplication through a shared [`VisitedSet`]
//! - Concurrent expansion of every link on a page
//! - Merging child outcomes and short-circuiting on the first match
//!
//! A run owns a [`CancellationToken`]. The first page that matches cancels it,
//! and every pending fetch, permit wait and retry back-off in the run watches
//! that token, so sibling work stops instead of being awaited.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{FetchError, Fetcher, HttpFetcher};
use crate::crawler::matcher::SearchTerm;
use crate::crawler::parser::{Extractor, HtmlExtractor};
use crate::crawler::visited::VisitedSet;
use crate::url::Address;
use crate::SeekError;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A page whose body text contains the search term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Address the matching page was fetched from
    pub address: Address,

    /// Title of the matching page (may be empty)
    pub title: String,

    /// Number of case-insensitive occurrences, always > 0
    pub match_count: usize,
}

/// A non-seed branch whose fetch failed and was dropped from the traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBranch {
    pub address: Address,
    pub depth: u32,
    pub error: FetchError,
}

/// Result of traversing from one starting point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Deepest level explored by this branch, or where the depth bound hit
    pub depth_reached: u32,

    /// Every address this branch claimed, each at most once
    pub visited: Vec<Address>,

    /// The surfaced match, if any
    pub matched: Option<MatchRecord>,

    /// Branches whose fetch failed below the seed
    pub skipped: Vec<SkippedBranch>,

    /// The run-wide deadline cancelled the crawl before a match was found
    pub timed_out: bool,
}

impl CrawlOutcome {
    fn at_depth(depth: u32) -> Self {
        Self {
            depth_reached: depth,
            ..Self::default()
        }
    }

    /// Returns true if a match was surfaced
    pub fn found(&self) -> bool {
        self.matched.is_some()
    }

    /// Merges a child's outcome into this one
    ///
    /// An existing match is never replaced.
    fn absorb(&mut self, child: CrawlOutcome) {
        self.depth_reached = self.depth_reached.max(child.depth_reached);
        self.visited.extend(child.visited);
        self.skipped.extend(child.skipped);
        if self.matched.is_none() {
            self.matched = child.matched;
        }
    }
}

/// State shared by every branch of a single run
struct Run {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    term: SearchTerm,
    max_depth: u32,
    visited: VisitedSet,
    permits: Semaphore,
    cancel: CancellationToken,
    fetch_retries: u32,
    retry_delay: Duration,
}

impl Run {
    /// Fetches a body, honoring the permit pool, retries and cancellation
    ///
    /// Returns `Ok(None)` if the run was cancelled before the body arrived.
    async fn fetch(&self, address: &Address) -> Result<Option<String>, FetchError> {
        let mut attempt = 0;

        loop {
            let result = {
                let _permit = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Ok(None),
                    permit = self.permits.acquire() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return Ok(None),
                    },
                };

                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Ok(None),
                    result = self.fetcher.fetch(address) => result,
                }
            };

            match result {
                Ok(page) => return Ok(Some(page.body)),
                Err(error) if attempt < self.fetch_retries && error.is_retryable() => {
                    attempt += 1;
                    tracing::warn!(
                        "Fetch of {} failed ({}), retry {}/{}",
                        address,
                        error,
                        attempt,
                        self.fetch_retries
                    );
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => return Ok(None),
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Visits one address and, if it does not match, all of its links
///
/// An `Err` means this address could not be fetched; the caller decides
/// whether that is fatal (seed) or a skipped branch.
fn visit(
    run: Arc<Run>,
    address: Address,
    depth: u32,
) -> BoxFuture<'static, Result<CrawlOutcome, FetchError>> {
    async move {
        if depth >= run.max_depth {
            tracing::trace!("Depth bound reached at {} (depth {})", address, depth);
            return Ok(CrawlOutcome::at_depth(depth));
        }

        if run.cancel.is_cancelled() {
            return Ok(CrawlOutcome::at_depth(depth));
        }

        // Never re-enter a claimed address; it is either done or in flight
        if !run.visited.insert(&address) {
            tracing::debug!("Skipping already visited URL: {}", address);
            return Ok(CrawlOutcome::at_depth(depth));
        }

        tracing::debug!("Processing URL: {} (depth {})", address, depth);

        let mut outcome = CrawlOutcome {
            depth_reached: depth,
            visited: vec![address.clone()],
            ..CrawlOutcome::default()
        };

        let Some(body) = run.fetch(&address).await? else {
            return Ok(outcome);
        };

        let document = run.extractor.extract(&body, &address);
        let match_count = run.term.count_in(&document.body_text);

        if match_count > 0 {
            tracing::info!(
                "Search term found in {} ({} occurrences)",
                address,
                match_count
            );
            run.cancel.cancel();
            outcome.matched = Some(MatchRecord {
                address,
                title: document.title,
                match_count,
            });
            return Ok(outcome);
        }

        if run.cancel.is_cancelled() || document.links.is_empty() {
            return Ok(outcome);
        }

        let child_depth = depth + 1;
        let mut children = JoinSet::new();
        for link in document.links {
            let run = Arc::clone(&run);
            children.spawn(async move {
                let result = AssertUnwindSafe(visit(run, link.clone(), child_depth))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        Err(FetchError::Network {
                            message: "crawl branch panicked".to_string(),
                        })
                    });
                (link, result)
            });
        }

        while let Some(joined) = children.join_next().await {
            let (link, result) = match joined {
                Ok(pair) => pair,
                // Panics are caught inside the task, so only cancellation lands here
                Err(e) => {
                    tracing::error!("Crawl branch below {} did not complete: {}", address, e);
                    continue;
                }
            };

            match result {
                Ok(child) => {
                    let found = child.found();
                    outcome.absorb(child);
                    if found {
                        // Outcomes of siblings still running are discarded
                        children.abort_all();
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!("Skipping {}: {}", link, error);
                    outcome.visited.push(link.clone());
                    outcome.skipped.push(SkippedBranch {
                        address: link,
                        depth: child_depth,
                        error,
                    });
                }
            }
        }

        Ok(outcome)
    }
    .boxed()
}

/// Main crawler structure
///
/// A `Crawler` is reusable: every call to [`Crawler::crawl`] starts a new run
/// with its own visited set and cancellation token.
pub struct Crawler {
    config: CrawlerConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
}

impl Crawler {
    /// Creates a crawler from explicit capabilities
    pub fn new(
        config: CrawlerConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    /// Creates a crawler that fetches over HTTP and parses HTML
    pub fn from_config(config: &Config) -> Result<Self, SeekError> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(
            config.crawler.clone(),
            Arc::new(fetcher),
            Arc::new(HtmlExtractor),
        ))
    }

    /// Crawls from `seed` looking for `term`, at most `max_depth` hops deep
    ///
    /// # Errors
    ///
    /// * `SeekError::InvalidInput` - empty term, zero depth or a seed that is
    ///   not an absolute HTTP(S) URL; nothing is fetched
    /// * `SeekError::SeedUnreachable` - the seed itself could not be fetched
    ///
    /// Fetch failures below the seed never fail the run; they are reported in
    /// [`CrawlOutcome::skipped`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ripple_seek::config::Config;
    /// use ripple_seek::crawler::Crawler;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let crawler = Crawler::from_config(&Config::default())?;
    /// let outcome = crawler.crawl("https://example.com/", "domain", 3).await?;
    /// if let Some(found) = &outcome.matched {
    ///     println!("{} mentions it {} times", found.address, found.match_count);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(
        &self,
        seed: &str,
        term: &str,
        max_depth: u32,
    ) -> Result<CrawlOutcome, SeekError> {
        let term = SearchTerm::new(term)?;

        if max_depth == 0 {
            return Err(SeekError::InvalidInput(
                "max depth must be greater than 0".to_string(),
            ));
        }

        let seed = Address::parse(seed).map_err(|e| {
            SeekError::InvalidInput(format!("invalid seed address '{}': {}", seed, e))
        })?;

        let run = Arc::new(Run {
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            term,
            max_depth,
            visited: VisitedSet::new(),
            permits: Semaphore::new(self.config.max_concurrent_fetches.max(1) as usize),
            cancel: CancellationToken::new(),
            fetch_retries: self.config.fetch_retries,
            retry_delay: self.config.retry_delay(),
        });

        tracing::info!(
            "Starting crawl from {} for '{}' (max depth {})",
            seed,
            run.term.as_str(),
            max_depth
        );
        let start_time = Instant::now();

        let deadline = self.config.run_timeout().map(|limit| {
            let cancel = run.cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                tracing::warn!("Run timeout of {:?} reached, cancelling crawl", limit);
                cancel.cancel();
            })
        });

        let result = visit(Arc::clone(&run), seed.clone(), 0).await;

        if let Some(deadline) = deadline {
            deadline.abort();
        }

        let mut outcome = result.map_err(|source| SeekError::SeedUnreachable {
            address: seed.to_string(),
            source,
        })?;

        // Only a match or the deadline cancels a run
        outcome.timed_out = !outcome.found() && run.cancel.is_cancelled();

        tracing::info!(
            "Crawl completed in {:?}: {} pages visited, {} skipped, found: {}",
            start_time.elapsed(),
            outcome.visited.len(),
            outcome.skipped.len(),
            outcome.found()
        );

        Ok(outcome)
    }
}
