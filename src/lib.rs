//! Fathom: a depth-bounded concurrent crawl orchestrator
//!
//! This crate implements a recursive crawler that visits a seed address and
//! everything reachable from it within a depth budget, funnelling one outcome
//! per visited address into a single aggregation loop that enforces global
//! error and result quotas. Operator signals can cancel the running session
//! or start an additional shallow-depth ("lite") session alongside it.

pub mod config;
pub mod crawler;
pub mod fetcher;
pub mod lifecycle;

use thiserror::Error;

/// Main error type for Fathom operations
#[derive(Debug, Error)]
pub enum FathomError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to register signal handler: {0}")]
    Signal(#[from] std::io::Error),
}

/// Errors produced by a [`fetcher::Fetcher`] when visiting a single address.
///
/// These are never propagated as control flow by the engine; each one becomes
/// a `Failure` record counted against the session's error quota.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed for {address}: {message}")]
    Request { address: String, message: String },

    #[error("HTTP {status} for {address}")]
    Status { address: String, status: u16 },

    #[error("Expected HTML for {address}, got {content_type}")]
    ContentMismatch {
        address: String,
        content_type: String,
    },

    #[error("Failed to read body of {address}: {message}")]
    Body { address: String, message: String },
}

/// Result type alias for Fathom operations
pub type Result<T> = std::result::Result<T, FathomError>;

// Re-export commonly used types
pub use config::{CrawlConfig, Quotas};
pub use crawler::{run_session, CompletionCause, CrawlResult, SessionReport};
pub use fetcher::{Fetcher, HttpFetcher};
