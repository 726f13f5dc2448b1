//! Crawl engine - recursive, depth-bounded visit spawning
//!
//! The engine visits one address per task. A successful visit at a depth
//! below the budget spawns one independent task per distinct child address;
//! nothing awaits those subtrees, because session completion is observed by
//! the aggregator, not by the root call returning. The only observable effect
//! of a visit is the single [`CrawlResult`] it emits on the session sink.

use crate::config::CrawlConfig;
use crate::crawler::CrawlResult;
use crate::fetcher::Fetcher;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// The recursive crawl engine for one session
///
/// In-flight fan-out is gated by a semaphore sized from
/// [`CrawlConfig::max_in_flight`], so an adversarial branching factor cannot
/// put an unbounded number of fetches in flight at once. Spawned tasks that
/// are waiting on a permit hold nothing but their address and sink handle.
pub struct CrawlEngine {
    fetcher: Arc<dyn Fetcher>,
    config: CrawlConfig,
    permits: Arc<Semaphore>,
}

impl CrawlEngine {
    /// Creates an engine for one session
    pub fn new(fetcher: Arc<dyn Fetcher>, config: CrawlConfig) -> Arc<Self> {
        Arc::new(Self {
            permits: Arc::new(Semaphore::new(config.max_in_flight)),
            fetcher,
            config,
        })
    }

    /// Visits `address` at `depth` hops from the seed
    ///
    /// Behavior:
    /// - If `token` is already cancelled, returns without emitting anything.
    /// - Otherwise fetches the address and emits exactly one result for it.
    /// - On success below the depth budget, spawns a visit for each distinct
    ///   child at `depth + 1`. Failed addresses never spawn children, and
    ///   neither does any visit once cancellation has been observed.
    /// - Returns once its own result is emitted and its direct children are
    ///   launched; it does not wait for them to complete.
    ///
    /// A visit that has already passed its fetch still emits its result even
    /// if the session is cancelled meanwhile; cancellation only vetoes the
    /// recursion decision at that point.
    pub fn visit(
        self: Arc<Self>,
        token: CancellationToken,
        address: String,
        sink: mpsc::Sender<CrawlResult>,
        depth: u32,
    ) -> BoxFuture<'static, ()> {
        async move {
            if token.is_cancelled() {
                return;
            }

            // Gate the fetch on an in-flight permit, giving up if the
            // session is cancelled while we wait.
            let permit = tokio::select! {
                _ = token.cancelled() => return,
                acquired = self.permits.clone().acquire_owned() => match acquired {
                    Ok(permit) => permit,
                    Err(_) => return,
                },
            };

            tracing::debug!("visiting {} at depth {}", address, depth);
            let fetched = self.fetcher.fetch(&address).await;
            drop(permit);

            match fetched {
                Ok(children) => {
                    let result = CrawlResult::Success {
                        address: address.clone(),
                    };
                    if sink.send(result).await.is_err() {
                        // Aggregator is gone, the session is over.
                        return;
                    }

                    if depth >= self.config.max_depth || token.is_cancelled() {
                        return;
                    }

                    let mut seen = HashSet::new();
                    for child in children {
                        if !seen.insert(child.clone()) {
                            continue;
                        }

                        let engine = Arc::clone(&self);
                        tokio::spawn(engine.visit(
                            token.clone(),
                            child,
                            sink.clone(),
                            depth + 1,
                        ));
                    }
                }
                Err(cause) => {
                    let _ = sink.send(CrawlResult::Failure { address, cause }).await;
                }
            }
        }
        .boxed()
    }
}
