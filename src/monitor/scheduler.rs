//! Scheduled polling state machine.
//!
//! A [`Scheduler`] moves through `Scheduled → Waiting → Running → Stopped`.
//! It waits for the target's lead window, fetches a baseline snapshot, then
//! polls at a fixed interval, diffing each snapshot against the last
//! known-good one until a stop rule fires.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tokio::time::Instant;

use super::change::{Change, FieldSet, detect};
use super::handle::{Channels, Phase, Progress, SchedulerHandle, Wake};
use super::policy::{StopCondition, StopPolicy, Verdict};
use super::schedule::StartPlan;
use super::{RunResult, ScheduleError, StopReason};
use crate::flight::{Snapshot, Target};
use crate::source::SnapshotSource;
use crate::time::{Clock, SystemClock};

/// Longest step between wall-clock checks while waiting to start.
pub const WAIT_STEP: Duration = Duration::from_secs(1);

/// Longest accepted run duration (48 hours).
pub const MAX_RUN_DURATION: Duration = Duration::from_secs(48 * 3600);

/// Validated polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    interval: Duration,
    max_duration: Duration,
    stop_on_change: bool,
    fields: FieldSet,
}

impl PollSettings {
    /// Creates settings with stop-on-change enabled and the core field set.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDuration`] if either duration is zero
    /// or `max_duration` exceeds [`MAX_RUN_DURATION`].
    pub fn new(interval: Duration, max_duration: Duration) -> Result<Self, ScheduleError> {
        if interval.is_zero() {
            return Err(ScheduleError::InvalidDuration {
                field: "interval",
                reason: "must be greater than 0".to_string(),
            });
        }

        if max_duration.is_zero() {
            return Err(ScheduleError::InvalidDuration {
                field: "max_duration",
                reason: "must be greater than 0".to_string(),
            });
        }

        if max_duration > MAX_RUN_DURATION {
            return Err(ScheduleError::InvalidDuration {
                field: "max_duration",
                reason: format!("must be at most {} hours", MAX_RUN_DURATION.as_secs() / 3600),
            });
        }

        Ok(Self {
            interval,
            max_duration,
            stop_on_change: true,
            fields: FieldSet::Core,
        })
    }

    /// Sets whether the first detected change ends the run.
    #[must_use]
    pub const fn with_stop_on_change(mut self, stop_on_change: bool) -> Self {
        self.stop_on_change = stop_on_change;
        self
    }

    /// Sets which fields are compared.
    #[must_use]
    pub const fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = fields;
        self
    }

    /// Returns the interval between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the hard deadline measured from the start of polling.
    #[must_use]
    pub const fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Returns true if the first detected change ends the run.
    #[must_use]
    pub const fn stop_on_change(&self) -> bool {
        self.stop_on_change
    }

    /// Returns the compared field set.
    #[must_use]
    pub const fn fields(&self) -> FieldSet {
        self.fields
    }
}

/// Mutable state of one run, owned by the tick loop.
#[derive(Debug, Default)]
struct RunState {
    started: Option<Instant>,
    started_at: Option<DateTime<FixedOffset>>,
    ticks: u32,
    last_good: Option<Snapshot>,
    changes: Vec<Change>,
    last_error: Option<String>,
}

impl RunState {
    fn elapsed(&self) -> Duration {
        self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    fn progress(&self, phase: Phase) -> Progress {
        Progress {
            phase,
            ticks: self.ticks,
            last_snapshot: self.last_good.clone(),
            changes: self.changes.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Scheduled flight poller.
///
/// # Type Parameters
///
/// * `S` - The [`SnapshotSource`] used to fetch snapshots
/// * `C` - The [`Clock`] used for civil time (defaults to [`SystemClock`])
///
/// # Example
///
/// ```ignore
/// use flight_watch::flight::Target;
/// use flight_watch::monitor::{PollSettings, Scheduler};
/// use std::time::Duration;
///
/// let target = Target::new("PSCBJ", "14:30", Duration::from_secs(15 * 60))?;
/// let settings = PollSettings::new(Duration::from_secs(30), Duration::from_secs(4 * 3600))?;
/// let scheduler = Scheduler::new(target, source, settings);
///
/// let handle = scheduler.handle();
/// let result = tokio::spawn(scheduler.run()).await?;
/// println!("stopped: {}", result.reason);
/// ```
#[derive(Debug)]
pub struct Scheduler<S, C = SystemClock> {
    target: Target,
    source: S,
    clock: C,
    interval: Duration,
    fields: FieldSet,
    policy: StopPolicy,
    channels: Channels,
}

impl<S> Scheduler<S, SystemClock>
where
    S: SnapshotSource,
{
    /// Creates a scheduler using the system's local time.
    #[must_use]
    pub fn new(target: Target, source: S, settings: PollSettings) -> Self {
        Self::with_clock(target, source, SystemClock::local(), settings)
    }
}

impl<S, C> Scheduler<S, C>
where
    S: SnapshotSource,
    C: Clock,
{
    /// Creates a scheduler with a custom clock.
    ///
    /// This constructor allows injecting a mock clock for testing.
    #[must_use]
    pub fn with_clock(target: Target, source: S, clock: C, settings: PollSettings) -> Self {
        let policy = StopPolicy::new(settings.max_duration())
            .with_stop_on_change(settings.stop_on_change());

        Self {
            target,
            source,
            clock,
            interval: settings.interval(),
            fields: settings.fields(),
            policy,
            channels: Channels::new(),
        }
    }

    /// Installs an external stop condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl StopCondition + 'static) -> Self {
        self.policy = self.policy.with_condition(condition);
        self
    }

    /// Returns a handle for stopping and observing the run.
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        self.channels.handle()
    }

    /// Returns the monitored target.
    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.target
    }

    /// Executes the full state machine and returns the terminal result.
    ///
    /// Never fails: every outcome, including a fetch failure on the baseline
    /// tick, is described by the returned [`RunResult`]. Consumes the
    /// scheduler; a new run needs a new instance.
    pub async fn run(mut self) -> RunResult {
        let mut state = RunState::default();

        if self.channels.is_cancelled() {
            return self.finish(state, StopReason::CancelledBeforeStart);
        }

        let plan = StartPlan::resolve(&self.target, self.clock.now());
        tracing::info!(
            target_id = %self.target.id,
            event_at = %plan.event_at,
            start_at = %plan.start_at,
            rolled_forward = plan.rolled_forward,
            "Monitoring scheduled"
        );

        self.channels.publish(state.progress(Phase::Waiting {
            start_at: plan.start_at,
        }));

        if self.wait_until(&plan).await == Wake::Cancelled {
            tracing::info!(target_id = %self.target.id, "Cancelled while waiting to start");
            return self.finish(state, StopReason::UserCancelled);
        }

        let reason = self.poll(&mut state).await;
        self.finish(state, reason)
    }

    /// Waits until the plan is due, re-reading the wall clock every [`WAIT_STEP`].
    async fn wait_until(&mut self, plan: &StartPlan) -> Wake {
        loop {
            let now = self.clock.now();
            if plan.is_due(now) {
                return Wake::Elapsed;
            }

            let remaining = plan.wait_from(now);
            tracing::trace!(
                target_id = %self.target.id,
                remaining_secs = remaining.as_secs(),
                "Waiting to start"
            );

            if self.channels.sleep(remaining.min(WAIT_STEP)).await == Wake::Cancelled {
                return Wake::Cancelled;
            }
        }
    }

    /// Runs the baseline fetch and the tick loop, returning why it stopped.
    async fn poll(&mut self, state: &mut RunState) -> StopReason {
        state.started = Some(Instant::now());
        state.started_at = Some(self.clock.now());
        tracing::info!(target_id = %self.target.id, "Monitoring started");

        if let Err(reason) = self.fetch_baseline(state).await {
            return reason;
        }

        loop {
            if self.channels.is_cancelled() {
                return StopReason::UserCancelled;
            }

            if let Verdict::Stop(reason) = self.policy.check_condition() {
                tracing::info!(target_id = %self.target.id, "External stop condition met");
                return reason;
            }

            let nap = self.interval.min(self.policy.remaining(state.elapsed()));
            if self.channels.sleep(nap).await == Wake::Cancelled {
                return StopReason::UserCancelled;
            }

            if self.policy.deadline_reached(state.elapsed()) {
                return StopReason::Timeout;
            }

            if let Verdict::Stop(reason) = self.tick(state).await {
                return reason;
            }
        }
    }

    /// Fetches the baseline snapshot. Failure here ends the run.
    async fn fetch_baseline(&self, state: &mut RunState) -> Result<(), StopReason> {
        state.ticks = 1;

        match self.source.fetch(&self.target.id).await {
            Ok(snapshot) => {
                tracing::debug!(
                    target_id = %self.target.id,
                    status = snapshot.status.as_deref().unwrap_or("unknown"),
                    "Baseline established"
                );
                state.last_good = Some(snapshot);
                self.channels.publish(state.progress(Phase::Running));
                Ok(())
            }
            Err(e) => {
                tracing::error!(target_id = %self.target.id, "Baseline fetch failed: {e}");
                state.last_error = Some(e.to_string());
                Err(StopReason::Error)
            }
        }
    }

    /// Performs one fetch and diff.
    ///
    /// A failed fetch keeps the last known-good snapshot as the baseline and
    /// continues; only a successful one is diffed and evaluated. The new
    /// baseline keeps the last known value of any field the fetch omitted.
    async fn tick(&self, state: &mut RunState) -> Verdict {
        state.ticks += 1;

        let snapshot = match self.source.fetch(&self.target.id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(target_id = %self.target.id, tick = state.ticks, "Fetch failed: {e}");
                state.last_error = Some(e.to_string());
                self.channels.publish(state.progress(Phase::Running));
                return Verdict::Continue;
            }
        };

        let changes = detect(state.last_good.as_ref(), &snapshot, self.fields);
        for change in &changes {
            tracing::debug!(target_id = %self.target.id, tick = state.ticks, "{change}");
        }

        let verdict = self.policy.after_tick(&changes, state.elapsed());

        state.changes.extend(changes);
        state.last_good = Some(match state.last_good.take() {
            Some(earlier) => snapshot.merged_over(&earlier),
            None => snapshot,
        });
        state.last_error = None;
        self.channels.publish(state.progress(Phase::Running));

        // A stop requested during the fetch outranks whatever the tick decided.
        if self.channels.is_cancelled() {
            return Verdict::Stop(StopReason::UserCancelled);
        }

        verdict
    }

    /// Assembles the result and publishes the terminal phase.
    fn finish(self, state: RunState, reason: StopReason) -> RunResult {
        let elapsed = state.elapsed();
        self.channels.publish(state.progress(Phase::Stopped(reason)));

        tracing::info!(
            target_id = %self.target.id,
            %reason,
            ticks = state.ticks,
            changes = state.changes.len(),
            elapsed_secs = elapsed.as_secs(),
            "Monitoring stopped"
        );

        let error = if reason == StopReason::Error {
            state.last_error
        } else {
            None
        };

        RunResult {
            target: self.target.id,
            reason,
            final_snapshot: state.last_good,
            changes: state.changes,
            error,
            started_at: state.started_at,
            elapsed,
            ticks: state.ticks,
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
