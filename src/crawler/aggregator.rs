//! Result aggregator - the single consumer of a session's result sink
//!
//! Exactly one aggregation loop runs per session. It is the only place where
//! quota state is read or written, it processes results strictly one at a
//! time in arrival order, and it is the only component authorized to declare
//! the session finished.

use crate::config::Quotas;
use crate::crawler::CrawlResult;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Why a session's aggregation loop terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    /// The error quota was exhausted
    ErrorQuota,

    /// The result quota was exhausted
    ResultQuota,

    /// The session's cancellation token fired
    Cancelled,

    /// Every producer finished and the sink closed
    Drained,
}

/// Spawns the aggregation loop for one session
///
/// The returned handle resolves exactly once, whatever the cause. Quota
/// counters live entirely inside the spawned task; nothing else can observe
/// or mutate them.
///
/// # Arguments
///
/// * `token` - The session's cancellation token; observed concurrently with
///   receiving, and terminates the loop without draining pending results
/// * `sink` - Receiving end of the session's result channel
/// * `quotas` - Error and result quotas for this session
pub fn aggregate(
    token: CancellationToken,
    mut sink: mpsc::Receiver<CrawlResult>,
    quotas: Quotas,
) -> JoinHandle<CompletionCause> {
    tokio::spawn(async move {
        let mut remaining_errors = quotas.max_errors;
        let mut remaining_results = quotas.max_results;

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("session cancelled");
                    return CompletionCause::Cancelled;
                }

                received = sink.recv() => match received {
                    None => {
                        tracing::info!("all visits finished");
                        return CompletionCause::Drained;
                    }

                    Some(CrawlResult::Failure { address, cause }) => {
                        tracing::warn!("crawl failed for {}: {}", address, cause);
                        remaining_errors = remaining_errors.saturating_sub(1);
                        if remaining_errors == 0 {
                            tracing::info!("max errors exceeded");
                            return CompletionCause::ErrorQuota;
                        }
                    }

                    Some(CrawlResult::Success { address }) => {
                        tracing::info!("crawling result: {}", address);
                        remaining_results = remaining_results.saturating_sub(1);
                        if remaining_results == 0 {
                            tracing::info!("got max results");
                            return CompletionCause::ResultQuota;
                        }
                    }
                },
            }
        }
    })
}
