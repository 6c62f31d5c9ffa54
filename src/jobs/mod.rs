//! Background pass scheduling
//!
//! One pass is a full scan/cache/prune cycle. The scheduler runs a pass,
//! then waits a fixed interval before the next one, so passes never overlap
//! and a slow pass simply delays its successor.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::services::{CachePruner, SnapshotScanner};

/// Scheduler pass states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RunningPass,
}

/// Periodic driver for the scan/cache/prune pipeline
pub struct Scheduler {
    scanner: SnapshotScanner,
    pruner: CachePruner,
    interval: Duration,
    state_tx: watch::Sender<SchedulerState>,
}

impl Scheduler {
    pub fn new(scanner: SnapshotScanner, pruner: CachePruner, interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(SchedulerState::Idle);
        Self {
            scanner,
            pruner,
            interval,
            state_tx,
        }
    }

    /// Subscribe to pass state transitions
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state_tx.subscribe()
    }

    /// Drive passes until `shutdown` fires.
    ///
    /// The first pass runs immediately on start; each subsequent pass starts
    /// a fixed interval after the previous one completed.
    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            self.run_pass().await;

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Scheduler stopped");
                    return;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Run a single scan/cache/prune pass.
    ///
    /// An enumeration failure ends the pass early (the prune sweep is
    /// skipped); the next pass still fires after the usual interval.
    pub async fn run_pass(&mut self) {
        self.state_tx.send_replace(SchedulerState::RunningPass);

        match self.scanner.process_files().await {
            Ok(summary) => {
                info!(
                    enumerated = summary.enumerated,
                    deleted = summary.deleted,
                    thumbnails_built = summary.thumbnails_built,
                    skipped_unparsed = summary.skipped_unparsed,
                    "Pass completed"
                );
                self.pruner.sweep().await;
            }
            Err(e) => {
                error!(error = %e, "Pass aborted");
            }
        }

        self.state_tx.send_replace(SchedulerState::Idle);
    }
}
