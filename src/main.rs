//! Fathom main entry point
//!
//! This is the command-line interface for the Fathom crawl orchestrator.

use anyhow::Result;
use clap::Parser;
use fathom::config::{
    CrawlConfig, Quotas, DEFAULT_LITE_DEPTH, DEFAULT_MAX_ERRORS, DEFAULT_MAX_IN_FLIGHT,
    DEFAULT_MAX_RESULTS,
};
use fathom::crawler::run_session_with_token;
use fathom::fetcher::{build_http_client, HttpFetcher};
use fathom::lifecycle::{ActiveSession, LifecycleController};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Fathom: a depth-bounded concurrent crawl orchestrator
///
/// Fathom crawls everything reachable from a seed URL within a depth budget,
/// stopping when either the error or the result quota runs out. While it
/// runs, SIGINT/SIGTERM shut the session down gracefully and SIGUSR1 starts
/// an additional shallow "lite" session alongside it.
#[derive(Parser, Debug)]
#[command(name = "fathom")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded concurrent crawl orchestrator", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(long)]
    url: String,

    /// Maximum depth (link hops from the seed) to crawl
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Number of fetch failures tolerated before the session stops
    #[arg(long, default_value_t = DEFAULT_MAX_ERRORS)]
    max_errors: u32,

    /// Number of successful results to collect before the session stops
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: u32,

    /// Depth budget used by lite sessions started via SIGUSR1
    #[arg(long, default_value_t = DEFAULT_LITE_DEPTH)]
    lite_depth: u32,

    /// Maximum number of fetches in flight at once
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    concurrency: usize,

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

    let config = CrawlConfig {
        max_depth: cli.depth,
        max_in_flight: cli.concurrency,
    };
    let quotas = Quotas {
        max_errors: cli.max_errors,
        max_results: cli.max_results,
        lite_depth: cli.lite_depth,
    };

    let user_agent = format!("fathom/{}", env!("CARGO_PKG_VERSION"));
    let client = build_http_client(&user_agent)?;
    let fetcher: Arc<dyn fathom::Fetcher> = Arc::new(HttpFetcher::new(client));

    // The primary session's token is shared with the signal watcher so
    // SIGINT/SIGTERM can cancel it from the outside.
    let token = CancellationToken::new();

    let controller = LifecycleController::spawn(ActiveSession {
        config,
        quotas,
        seed: cli.url.clone(),
        fetcher: Arc::clone(&fetcher),
        token: token.clone(),
    })?;

    let report = run_session_with_token(fetcher, config, quotas, cli.url, token).await;
    tracing::info!("{:?}", report.elapsed);

    // Wait for any lite sessions triggered via SIGUSR1 before exiting.
    let lite_reports = controller.drain().await;
    if !lite_reports.is_empty() {
        tracing::info!("{} lite session(s) finished", lite_reports.len());
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
            0 => EnvFilter::new("fathom=info,warn"),
            1 => EnvFilter::new("fathom=debug,info"),
            2 => EnvFilter::new("fathom=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
