//! Crawler module for depth-bounded concurrent crawling
//!
//! This module contains the orchestration core, including:
//! - The recursive crawl engine that spawns one task per visited address
//! - The aggregation loop that owns the session quotas
//! - Session setup, teardown and timing

mod aggregator;
mod engine;
mod session;

pub use aggregator::{aggregate, CompletionCause};
pub use engine::CrawlEngine;
pub use session::{run_session, run_session_with_token, SessionReport};

use crate::FetchError;

/// One outcome per attempted visit
///
/// Produced exactly once by whichever task handled the address, transferred
/// to the aggregator over the session sink, and consumed exactly once there.
#[derive(Debug)]
pub enum CrawlResult {
    /// The address was fetched successfully
    Success { address: String },

    /// The fetch failed; counted against the session's error quota
    Failure { address: String, cause: FetchError },
}

impl CrawlResult {
    /// The address this result is about
    pub fn address(&self) -> &str {
        match self {
            CrawlResult::Success { address } => address,
            CrawlResult::Failure { address, .. } => address,
        }
    }
}
