//! HTTP fetcher implementation
//!
//! This module handles all network access for the crawler:
//! - The [`Fetcher`] capability the orchestrator depends on
//! - Building HTTP clients with proper user agent strings
//! - GET requests with status and error classification
//!
//! Fetchers never retry. Retry policy belongs to the orchestrator.

use crate::config::Config;
use crate::url::Address;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use serde::Serialize;
use thiserror::Error;

/// A successfully fetched document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code (always in the success range)
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Why a fetch did not produce a document
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, or a broken body stream
    #[error("network error: {message}")]
    Network { message: String },

    /// The server answered with a status outside the success range
    #[error("HTTP status {status_code}")]
    Http { status_code: u16 },
}

impl FetchError {
    /// Returns true if a later attempt could plausibly succeed
    ///
    /// | Condition | Retryable |
    /// |-----------|-----------|
    /// | Network error | yes |
    /// | HTTP 5xx | yes |
    /// | HTTP 429 | yes |
    /// | Other HTTP status | no |
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status_code } => *status_code >= 500 || *status_code == 429,
        }
    }
}

/// Retrieves the raw body of a document
///
/// This is the only network-facing capability of the crawl. Implementations
/// report non-success statuses as [`FetchError::Http`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &Address) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use ripple_seek::config::Config;
/// use ripple_seek::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.http.request_timeout())
        .connect_timeout(config.http.connect_timeout())
        .redirect(Policy::limited(config.http.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &Address) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(address.as_str())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify_error)?;

        Ok(FetchedPage {
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Maps a transport error to a [`FetchError`]
fn classify_error(e: reqwest::Error) -> FetchError {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else if e.is_redirect() {
        format!("redirect error: {}", e)
    } else {
        e.to_string()
    };

    FetchError::Network { message }
}
