//! Configuration module for Ripple-Seek
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use ripple_seek::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple-seek.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::{MAX_CONCURRENCY_LIMIT, MAX_DEPTH_LIMIT, MAX_REDIRECTS_LIMIT};

impl Config {
    /// Validates the configuration, e.g. after command-line overrides
    pub fn validate(&self) -> crate::ConfigResult<()> {
        validation::validate(self)
    }
}
