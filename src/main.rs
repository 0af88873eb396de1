//! Ripple-Seek main entry point
//!
//! This is the command-line interface for the Ripple-Seek term crawler.

use anyhow::{Context, Result};
use clap::Parser;
use ripple_seek::config::{load_config_with_hash, Config};
use ripple_seek::crawler::Crawler;
use ripple_seek::output::{render_json, render_text};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Seek: find the first page that mentions a term
///
/// Ripple-Seek crawls outward from a seed page, following links up to a depth
/// bound, and stops as soon as a page contains the search term.
#[derive(Parser, Debug)]
#[command(name = "ripple-seek")]
#[command(version)]
#[command(about = "A concurrent term-seeking web crawler", long_about = None)]
struct Cli {
    /// Absolute http(s) address to start from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Text to search for (case-insensitive)
    #[arg(value_name = "TERM")]
    term: String,

    /// Maximum number of link hops from the seed
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of fetches in flight
    #[arg(long)]
    concurrency: Option<u32>,

    /// Wall-clock limit for the whole run, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Retries for transient fetch failures
    #[arg(long)]
    retries: Option<u32>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;

    let crawler = Crawler::from_config(&config).context("Failed to build HTTP client")?;
    let outcome = crawler
        .crawl(&cli.seed, &cli.term, config.crawler.max_depth)
        .await
        .with_context(|| format!("Crawl from {} failed", cli.seed))?;

    if cli.json {
        println!("{}", render_json(&outcome)?);
    } else {
        print!("{}", render_text(&outcome));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_seek=info,warn"),
            1 => EnvFilter::new("ripple_seek=debug,info"),
            2 => EnvFilter::new("ripple_seek=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn load_settings(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.run_timeout_ms = Some(timeout);
    }
    if let Some(retries) = cli.retries {
        config.crawler.fetch_retries = retries;
    }

    config.validate().context("Invalid settings")?;

    tracing::debug!(
        "Max depth: {}, max concurrent fetches: {}, retries: {}",
        config.crawler.max_depth,
        config.crawler.max_concurrent_fetches,
        config.crawler.fetch_retries
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli::parse_from([
            "ripple-seek",
            "https://example.com/",
            "needle",
            "-d",
            "3",
            "--concurrency",
            "2",
            "--timeout",
            "1500",
            "--retries",
            "1",
        ]);
        let config = load_settings(&cli).unwrap();
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_concurrent_fetches, 2);
        assert_eq!(config.crawler.run_timeout_ms, Some(1500));
        assert_eq!(config.crawler.fetch_retries, 1);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["ripple-seek", "https://example.com/", "needle", "-d", "0"]);
        assert!(load_settings(&cli).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["ripple-seek", "https://example.com/", "x", "-q", "-v"]);
        assert!(result.is_err());
    }
}
