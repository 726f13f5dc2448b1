//! Session orchestration - one independently cancellable crawl run
//!
//! A session owns a fresh cancellation token, a fresh result sink and a fresh
//! aggregator. Sessions share no mutable state, so the main crawl and any
//! lite-mode crawls started by the lifecycle controller run side by side
//! without coordinating.

use crate::config::{CrawlConfig, Quotas};
use crate::crawler::{aggregate, CompletionCause, CrawlEngine};
use crate::fetcher::Fetcher;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Capacity of a session's result channel
///
/// Producers block on a full channel, which backpressures the crawl against
/// the single aggregation loop.
const RESULT_BUFFER: usize = 64;

/// Outcome of one completed session
#[derive(Debug, Clone, Copy)]
pub struct SessionReport {
    /// Why the aggregation loop stopped
    pub cause: CompletionCause,

    /// Wall-clock time from session start to aggregator completion
    pub elapsed: Duration,
}

/// Runs one crawl session to completion with its own cancellation token
pub async fn run_session(
    fetcher: Arc<dyn Fetcher>,
    config: CrawlConfig,
    quotas: Quotas,
    seed: String,
) -> SessionReport {
    run_session_with_token(fetcher, config, quotas, seed, CancellationToken::new()).await
}

/// Runs one crawl session to completion
///
/// The token is exposed so that the lifecycle controller can cancel the
/// primary session from the outside; lite sessions use a private token.
///
/// The root visit is launched at depth 0; completion is observed solely
/// through the aggregator, which stops on quota exhaustion, cancellation, or
/// the sink closing after every visit task has finished. The token is
/// cancelled on the way out regardless of cause, which is a no-op for an
/// already-cancelled session and stops any straggler tasks otherwise. An
/// in-flight fetch is never interrupted; a task past its fetch notices the
/// cancelled token before spawning children and winds down on its own.
pub async fn run_session_with_token(
    fetcher: Arc<dyn Fetcher>,
    config: CrawlConfig,
    quotas: Quotas,
    seed: String,
    token: CancellationToken,
) -> SessionReport {
    let started = Instant::now();
    tracing::info!("starting session for {} with depth {}", seed, config.max_depth);

    let (sink, results) = mpsc::channel(RESULT_BUFFER);
    let done = aggregate(token.clone(), results, quotas);

    let engine = CrawlEngine::new(fetcher, config);
    tokio::spawn(engine.visit(token.clone(), seed, sink, 0));
    // The root sender was moved into the visit; the sink closes once the
    // last visit task drops its clone.

    let cause = match done.await {
        Ok(cause) => cause,
        Err(e) => {
            tracing::error!("aggregator task failed: {}", e);
            CompletionCause::Cancelled
        }
    };

    token.cancel();

    let elapsed = started.elapsed();
    tracing::info!("session finished in {:?} ({:?})", elapsed, cause);

    SessionReport { cause, elapsed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FetchError;
    use async_trait::async_trait;

    /// Fetcher that fails every address
    struct AlwaysFails;

    #[async_trait]
    impl Fetcher for AlwaysFails {
        async fn fetch(&self, address: &str) -> Result<Vec<String>, FetchError> {
            Err(FetchError::Request {
                address: address.to_string(),
                message: "unreachable".to_string(),
            })
        }
    }

    /// Fetcher that never resolves until the session is cancelled
    struct Hangs;

    #[async_trait]
    impl Fetcher for Hangs {
        async fn fetch(&self, _address: &str) -> Result<Vec<String>, FetchError> {
            futures::future::pending().await
        }
    }

    fn quotas(max_errors: u32, max_results: u32) -> Quotas {
        Quotas {
            max_errors,
            max_results,
            lite_depth: 2,
        }
    }

    #[tokio::test]
    async fn test_failing_seed_exhausts_error_quota_of_one() {
        let report = run_session(
            Arc::new(AlwaysFails),
            CrawlConfig::new(3),
            quotas(1, 100),
            "A".to_string(),
        )
        .await;

        assert_eq!(report.cause, CompletionCause::ErrorQuota);
    }

    #[tokio::test]
    async fn test_cancelling_before_any_visit_completes() {
        let token = CancellationToken::new();
        token.cancel();

        let report = run_session_with_token(
            Arc::new(Hangs),
            CrawlConfig::new(3),
            quotas(100, 100),
            "A".to_string(),
            token,
        )
        .await;

        assert_eq!(report.cause, CompletionCause::Cancelled);
    }

    #[tokio::test]
    async fn test_cancelling_mid_flight_unblocks_session() {
        let token = CancellationToken::new();
        let cancel = token.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let report = run_session_with_token(
            Arc::new(Hangs),
            CrawlConfig::new(3),
            quotas(100, 100),
            "A".to_string(),
            token,
        )
        .await;

        assert_eq!(report.cause, CompletionCause::Cancelled);
    }
}
