//! Change-feed subscription lifecycle.
//!
//! One [`FeedSubscriber`] per session: it applies the provider's initial
//! snapshot, then runs exactly one background consumption loop that applies
//! change batches to the store strictly in arrival order. Queries run on
//! caller tasks and are never blocked by the loop.
//!
//! Disposal is cancel-then-join: the cancellation token stops the loop
//! before the next batch, the join suppresses cancellation as expected
//! termination, and calling shutdown more than once is safe.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::warn;

use super::ErrorLogProvider;
use super::ResourceProvider;
use crate::model::ResourceChange;
use crate::session::ResourceViewSession;
use crate::Result;

pub struct FeedSubscriber {
    cancellation: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedSubscriber {
    /// Subscribe to the provider, apply the initial snapshot and start the
    /// consumption loop.
    pub async fn start(
        provider: Arc<dyn ResourceProvider>,
        session: Arc<ResourceViewSession>,
        cancellation: CancellationToken,
    ) -> Result<Self> {
        let (snapshot, changes) = provider
            .subscribe(session.config().change_buffer_capacity, cancellation.child_token())
            .await?;

        session.apply_snapshot(snapshot)?;

        let task = tokio::spawn(consume_changes(changes, session, cancellation.clone()));

        Ok(Self {
            cancellation,
            task: Mutex::new(Some(task)),
        })
    }

    /// Cancel the consumption loop and await its termination, treating
    /// cancellation as expected. Safe to invoke more than once.
    pub async fn shutdown(&self) {
        self.cancellation.cancel();

        let task = self.task.lock().take();
        if let Some(task) = task {
            match task.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!("consumption task failed: {e}"),
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// The single consumption loop. Batches are applied sequentially, never
/// concurrently; each event is independently applied so a cancelled loop
/// needs no partial-batch rollback.
async fn consume_changes(
    mut changes: mpsc::Receiver<Vec<ResourceChange>>,
    session: Arc<ResourceViewSession>,
    cancellation: CancellationToken,
) {
    loop {
        tokio::select! {
            // Use biased to ensure branch order
            biased;
            _ = cancellation.cancelled() => {
                debug!("change feed consumption cancelled");
                return;
            }
            batch = changes.recv() => {
                match batch {
                    Some(batch) => {
                        debug!("applying change batch of {} events", batch.len());
                        for change in batch {
                            session.apply_change(change);
                        }
                        session.after_batch();
                    }
                    None => {
                        warn!("change feed closed by provider");
                        return;
                    }
                }
            }
        }
    }
}

/// Watches the external log store and refreshes the per-application error
/// counts whenever it signals new logs. The diff gate inside the session
/// swallows signals that change nothing.
pub struct ErrorLogWatcher {
    cancellation: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ErrorLogWatcher {
    pub fn start(
        provider: Arc<dyn ErrorLogProvider>,
        session: Arc<ResourceViewSession>,
        cancellation: CancellationToken,
    ) -> Self {
        let mut new_logs = provider.subscribe_new_logs();

        // Seed the snapshot before the first signal arrives.
        session.refresh_error_counts(provider.unviewed_error_counts());

        let task = {
            let cancellation = cancellation.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        biased;
                        _ = cancellation.cancelled() => {
                            debug!("error log watcher cancelled");
                            return;
                        }
                        signal = new_logs.recv() => {
                            if signal.is_none() {
                                debug!("error log signal channel closed");
                                return;
                            }
                            session.refresh_error_counts(provider.unviewed_error_counts());
                        }
                    }
                }
            })
        };

        Self {
            cancellation,
            task: Mutex::new(Some(task)),
        }
    }

    pub async fn shutdown(&self) {
        self.cancellation.cancel();

        let task = self.task.lock().take();
        if let Some(task) = task {
            match task.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!("error log watcher failed: {e}"),
            }
        }
    }
}
