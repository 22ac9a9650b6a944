//! Stop policy evaluated once per tick.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{Change, StopReason};

/// An externally supplied "should monitoring end now?" query.
///
/// Implementations must be side-effect free and quick; the query runs on the
/// polling task before every fetch. Any `Fn() -> bool` closure qualifies.
///
/// # Example
///
/// ```
/// use flight_watch::monitor::StopCondition;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// let confirmed = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&confirmed);
/// let condition = move || flag.load(Ordering::SeqCst);
///
/// assert!(!condition.should_stop());
/// confirmed.store(true, Ordering::SeqCst);
/// assert!(condition.should_stop());
/// ```
pub trait StopCondition: Send + Sync {
    /// Returns true when monitoring should end.
    fn should_stop(&self) -> bool;
}

impl<F> StopCondition for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_stop(&self) -> bool {
        self()
    }
}

/// Stops monitoring once a file exists.
///
/// Lets another process (or a person) end a run by touching a path.
#[derive(Debug, Clone)]
pub struct StopFile {
    path: PathBuf,
}

impl StopFile {
    /// Creates a condition watching `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the watched path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StopCondition for StopFile {
    fn should_stop(&self) -> bool {
        self.path.exists()
    }
}

/// Outcome of evaluating the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep polling.
    Continue,
    /// End the run.
    Stop(StopReason),
}

/// Composite stop rules, in fixed precedence.
///
/// 1. External condition ([`StopReason::ConditionMet`]), checked before a fetch
/// 2. Stop-on-change ([`StopReason::ChangeDetected`])
/// 3. Hard deadline ([`StopReason::Timeout`])
///
/// Cancellation outranks all of these and is handled by the scheduler.
pub struct StopPolicy {
    stop_on_change: bool,
    max_duration: Duration,
    condition: Option<Box<dyn StopCondition>>,
}

impl fmt::Debug for StopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopPolicy")
            .field("stop_on_change", &self.stop_on_change)
            .field("max_duration", &self.max_duration)
            .field("has_condition", &self.condition.is_some())
            .finish()
    }
}

impl StopPolicy {
    /// Creates a policy that only enforces the deadline.
    #[must_use]
    pub const fn new(max_duration: Duration) -> Self {
        Self {
            stop_on_change: false,
            max_duration,
            condition: None,
        }
    }

    /// Sets whether any detected change ends the run.
    #[must_use]
    pub const fn with_stop_on_change(mut self, stop_on_change: bool) -> Self {
        self.stop_on_change = stop_on_change;
        self
    }

    /// Installs an external stop condition, replacing any previous one.
    #[must_use]
    pub fn with_condition(mut self, condition: impl StopCondition + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Returns the hard deadline measured from the start of polling.
    #[must_use]
    pub const fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Returns true if the run ends on the first change.
    #[must_use]
    pub const fn stop_on_change(&self) -> bool {
        self.stop_on_change
    }

    /// Returns true if an external condition is installed.
    #[must_use]
    pub const fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    /// Evaluates the external condition (rule 1).
    #[must_use]
    pub fn check_condition(&self) -> Verdict {
        match &self.condition {
            Some(condition) if condition.should_stop() => Verdict::Stop(StopReason::ConditionMet),
            _ => Verdict::Continue,
        }
    }

    /// Evaluates rules 2 and 3 after a successful fetch and diff.
    #[must_use]
    pub fn after_tick(&self, changes: &[Change], elapsed: Duration) -> Verdict {
        if self.stop_on_change && !changes.is_empty() {
            return Verdict::Stop(StopReason::ChangeDetected);
        }

        if self.deadline_reached(elapsed) {
            return Verdict::Stop(StopReason::Timeout);
        }

        Verdict::Continue
    }

    /// Returns true once `elapsed` has reached the maximum duration.
    #[must_use]
    pub fn deadline_reached(&self, elapsed: Duration) -> bool {
        elapsed >= self.max_duration
    }

    /// Returns the time left before the deadline.
    #[must_use]
    pub const fn remaining(&self, elapsed: Duration) -> Duration {
        self.max_duration.saturating_sub(elapsed)
    }
}
