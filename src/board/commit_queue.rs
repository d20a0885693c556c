//! Async commit layer.
//!
//! Status commits run as spawned tasks so a new drag can be applied while
//! earlier commits are still in flight. Their outcomes come back through a
//! bounded channel and are fed to the engine as actions, in arrival order.
//! A task that panics still reports back, so waiting on the queue always ends.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::board::engine::{BoardEngine, CommitOutcome};
use crate::board::session::PendingMove;
use crate::error::BoardError;
use crate::remote::EventStore;

const CHANNEL_CAPACITY: usize = 100;
const MAX_BATCH_SIZE: usize = 10;

/// Runs status commits in the background and collects their outcomes
pub struct CommitQueue {
    /// `None` marks a task that panicked before producing an outcome
    tx: mpsc::Sender<Option<CommitOutcome>>,
    rx: mpsc::Receiver<Option<CommitOutcome>>,
    outstanding: usize,
}

impl Default for CommitQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            rx,
            outstanding: 0,
        }
    }

    /// Number of commits whose outcome has not been received yet
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding == 0
    }

    /// Spawn a commit future. Must be called from within a tokio runtime.
    pub fn submit<F>(&mut self, commit: F)
    where
        F: Future<Output = CommitOutcome> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.outstanding += 1;
        tokio::spawn(async move {
            let delivered = match AssertUnwindSafe(commit).catch_unwind().await {
                Ok(outcome) => Some(outcome),
                Err(_) => {
                    tracing::error!("Commit task panicked before reporting an outcome");
                    None
                }
            };
            if tx.send(delivered).await.is_err() {
                tracing::warn!("Commit queue closed before outcome was delivered");
            }
        });
    }

    /// Spawn the status commit for a pending move.
    ///
    /// If the commit panics it is reported as a failed commit, so the move is
    /// rolled back like any other failure.
    pub fn submit_move<S: EventStore + 'static>(
        &mut self,
        engine: &BoardEngine<S>,
        pending: &PendingMove,
    ) {
        let seq = pending.seq;
        let event_id = pending.event_id.clone();
        let commit = engine.commit_request(pending);
        self.submit(async move {
            match AssertUnwindSafe(commit).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => CommitOutcome {
                    seq,
                    event_id,
                    error: Some("status commit aborted unexpectedly".to_string()),
                },
            }
        });
    }

    /// Wait for the next outcome. Returns `None` when nothing is outstanding.
    pub async fn next(&mut self) -> Option<CommitOutcome> {
        while self.outstanding > 0 {
            let delivered = self.rx.recv().await?;
            self.outstanding -= 1;
            if delivered.is_some() {
                return delivered;
            }
        }
        None
    }

    /// Take outcomes that have already arrived, without waiting
    pub fn drain_ready(&mut self) -> Vec<CommitOutcome> {
        let mut batch = Vec::new();
        while batch.len() < MAX_BATCH_SIZE {
            match self.rx.try_recv() {
                Ok(delivered) => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                    batch.extend(delivered);
                }
                Err(_) => break,
            }
        }
        batch
    }

    /// Apply already-arrived outcomes to the engine, returning the failures
    pub fn apply_ready<S: EventStore + 'static>(
        &mut self,
        engine: &mut BoardEngine<S>,
    ) -> Vec<BoardError> {
        self.drain_ready()
            .into_iter()
            .filter_map(|outcome| engine.resolve_commit(outcome).err())
            .collect()
    }

    /// Wait for every outstanding commit and apply each outcome as it
    /// arrives, returning the failures
    pub async fn settle<S: EventStore + 'static>(
        &mut self,
        engine: &mut BoardEngine<S>,
    ) -> Vec<BoardError> {
        let mut failures = Vec::new();
        while let Some(outcome) = self.next().await {
            if let Err(e) = engine.resolve_commit(outcome) {
                failures.push(e);
            }
        }
        failures
    }
}
