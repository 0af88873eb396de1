//! Ripple-Seek: a concurrent term-seeking web crawler
//!
//! This crate walks the link graph reachable from a seed page, looking for a
//! search term. The walk is depth-bounded, fetches every address at most once
//! per run, expands sibling links concurrently and stops as soon as one page
//! contains the term.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use crate::crawler::FetchError;
use thiserror::Error;

/// Main error type for Ripple-Seek operations
#[derive(Debug, Error)]
pub enum SeekError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Seed {address} is unreachable: {source}")]
    SeedUnreachable { address: String, source: FetchError },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome, Crawler, MatchRecord, SkippedBranch};
pub use crate::url::{normalize_url, Address};
