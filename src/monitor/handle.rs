//! Cross-task access to a running scheduler.
//!
//! The tick loop is the only writer of run state. After every completed tick
//! it publishes a fresh immutable [`Progress`] by replacing an `Arc` in a
//! `watch` channel; readers clone the `Arc` and never observe a partial update.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_stream::wrappers::WatchStream;

use super::{Change, StopReason};
use crate::flight::Snapshot;

/// Lifecycle phase of a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `run` not yet started.
    Scheduled,
    /// Waiting for the lead window to open.
    Waiting {
        /// When polling will begin.
        start_at: DateTime<FixedOffset>,
    },
    /// Polling.
    Running,
    /// Terminal.
    Stopped(StopReason),
}

impl Phase {
    /// Returns true for the terminal phase.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }
}

/// State of a run as of its most recently completed tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Current phase.
    pub phase: Phase,
    /// Fetch attempts so far.
    pub ticks: u32,
    /// Last known-good snapshot.
    pub last_snapshot: Option<Snapshot>,
    /// Changes detected so far.
    pub changes: Vec<Change>,
    /// Error from the most recent fetch, cleared by the next success.
    pub last_error: Option<String>,
}

impl Progress {
    const fn initial() -> Self {
        Self {
            phase: Phase::Scheduled,
            ticks: 0,
            last_snapshot: None,
            changes: Vec::new(),
            last_error: None,
        }
    }
}

/// Cloneable, thread-safe handle to a scheduler.
///
/// Obtained from [`super::Scheduler::handle`] before calling `run`.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    stop: Arc<watch::Sender<bool>>,
    progress: watch::Receiver<Arc<Progress>>,
}

impl SchedulerHandle {
    /// Requests the run to stop.
    ///
    /// Callable at any time from any thread. The run observes it at the next
    /// loop boundary or immediately while sleeping. Repeated calls are no-ops.
    pub fn request_stop(&self) {
        self.stop.send_replace(true);
    }

    /// Returns true once a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        *self.stop.borrow()
    }

    /// Returns the latest published progress.
    #[must_use]
    pub fn progress(&self) -> Arc<Progress> {
        Arc::clone(&self.progress.borrow())
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.progress.borrow().phase
    }

    /// Returns the last known-good snapshot.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.progress.borrow().last_snapshot.clone()
    }

    /// Returns the changes detected so far.
    #[must_use]
    pub fn changes_so_far(&self) -> Vec<Change> {
        self.progress.borrow().changes.clone()
    }

    /// Returns the number of fetch attempts so far.
    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.progress.borrow().ticks
    }

    /// Returns a stream yielding the current progress and every later update.
    ///
    /// Intermediate updates may be skipped by a slow reader, but each item is
    /// complete and `changes` is cumulative, so no change is ever lost.
    /// The stream ends when the scheduler is dropped.
    #[must_use]
    pub fn updates(&self) -> WatchStream<Arc<Progress>> {
        WatchStream::new(self.progress.clone())
    }
}

/// Result of an interruptible sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Wake {
    /// The full duration elapsed.
    Elapsed,
    /// A stop was requested.
    Cancelled,
}

/// Scheduler-side ends of the handle channels.
#[derive(Debug)]
pub(super) struct Channels {
    handle: SchedulerHandle,
    stop: watch::Receiver<bool>,
    progress: watch::Sender<Arc<Progress>>,
}

impl Channels {
    pub(super) fn new() -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (progress_tx, progress_rx) = watch::channel(Arc::new(Progress::initial()));

        Self {
            handle: SchedulerHandle {
                stop: Arc::new(stop_tx),
                progress: progress_rx,
            },
            stop: stop_rx,
            progress: progress_tx,
        }
    }

    pub(super) fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    pub(super) fn is_cancelled(&self) -> bool {
        *self.stop.borrow()
    }

    pub(super) fn publish(&self, progress: Progress) {
        self.progress.send_replace(Arc::new(progress));
    }

    /// Sleeps for `duration` unless a stop is requested first.
    pub(super) async fn sleep(&mut self, duration: Duration) -> Wake {
        if self.is_cancelled() {
            return Wake::Cancelled;
        }

        let deadline = Instant::now() + duration;
        let stop = &mut self.stop;

        tokio::select! {
            biased;

            stopped = stop.wait_for(|&requested| requested) => {
                // The sender lives in `self.handle`, so this cannot fail while we run.
                if stopped.is_ok() { Wake::Cancelled } else { Wake::Elapsed }
            }

            () = tokio::time::sleep_until(deadline) => Wake::Elapsed,
        }
    }
}
