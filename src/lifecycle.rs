//! Lifecycle controller - operator signals for one running crawl
//!
//! Two independent trigger classes:
//! - SIGINT / SIGTERM cancel the primary session's token. The session then
//!   ends through the aggregator's cancelled path.
//! - SIGUSR1 starts a brand-new, independent session with a depth budget
//!   reduced from the active configuration ("lite" mode). The primary
//!   session is left entirely alone; the trigger may fire any number of
//!   times and each firing adds one more session.
//!
//! The controller holds an explicit handle to the active session's
//! configuration rather than reading any global state, and keeps the join
//! handles of the lite sessions it starts so the process can wait for all
//! of them before exiting.

use crate::config::{CrawlConfig, Quotas};
use crate::crawler::{run_session, SessionReport};
use crate::fetcher::Fetcher;
use std::sync::{Arc, Mutex};
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Everything the controller needs to know about the primary session
#[derive(Clone)]
pub struct ActiveSession {
    /// The primary session's configuration, used to derive lite configs
    pub config: CrawlConfig,

    /// Quotas applied to every session, primary and lite alike
    pub quotas: Quotas,

    /// The seed address the primary session was started with
    pub seed: String,

    /// The fetcher shared by every session
    pub fetcher: Arc<dyn Fetcher>,

    /// The primary session's cancellation token
    pub token: CancellationToken,
}

/// Watches operator signals on behalf of one primary session
pub struct LifecycleController {
    active: ActiveSession,
    lite_sessions: Mutex<Vec<JoinHandle<SessionReport>>>,
}

impl LifecycleController {
    /// Registers signal handlers and starts the watch loop
    ///
    /// # Returns
    ///
    /// * `Ok(controller)` - Signal handlers installed, watch loop running
    /// * `Err(FathomError)` - The OS refused a signal registration
    pub fn spawn(active: ActiveSession) -> crate::Result<Arc<Self>> {
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let mut reconfigure = signal(SignalKind::user_defined1())?;

        let controller = Arc::new(Self {
            active,
            lite_sessions: Mutex::new(Vec::new()),
        });

        let watcher = Arc::clone(&controller);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interrupt.recv() => {
                        tracing::info!("got interrupt signal");
                        watcher.active.token.cancel();
                    }
                    _ = terminate.recv() => {
                        tracing::info!("got terminate signal");
                        watcher.active.token.cancel();
                    }
                    _ = reconfigure.recv() => {
                        watcher.start_lite_session();
                    }
                }
            }
        });

        Ok(controller)
    }

    /// Starts one independent lite-mode session
    ///
    /// The lite configuration is derived fresh from the active one on every
    /// call; the primary session's token is never touched.
    pub fn start_lite_session(&self) {
        let config = self.active.config.lite(self.active.quotas.lite_depth);
        tracing::info!("starting lite session with depth {}", config.max_depth);

        let handle = tokio::spawn(run_session(
            Arc::clone(&self.active.fetcher),
            config,
            self.active.quotas,
            self.active.seed.clone(),
        ));

        self.lite_sessions
            .lock()
            .expect("lite session list poisoned")
            .push(handle);
    }

    /// Waits for every lite session started so far
    ///
    /// Sessions triggered while draining are waited for as well; the process
    /// exits only once no session is left running.
    pub async fn drain(&self) -> Vec<SessionReport> {
        let mut reports = Vec::new();

        loop {
            let handle = {
                let mut sessions = self
                    .lite_sessions
                    .lock()
                    .expect("lite session list poisoned");
                sessions.pop()
            };

            let Some(handle) = handle else {
                return reports;
            };

            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!("lite session task failed: {}", e),
            }
        }
    }
}
