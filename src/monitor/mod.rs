//! Monitor layer: scheduled polling and change detection.
//!
//! This module provides types and functions for:
//! - Detecting changes between snapshots ([`Change`], [`Field`], [`detect`])
//! - Resolving when polling should start ([`StartPlan`])
//! - Deciding when polling should stop ([`StopPolicy`], [`StopCondition`])
//! - Running the state machine ([`Scheduler`], [`PollSettings`])
//! - Observing and cancelling a run ([`SchedulerHandle`], [`Progress`])
//! - Error handling ([`ScheduleError`])

mod change;
mod error;
mod handle;
mod policy;
mod result;
mod schedule;
mod scheduler;

pub use change::{Change, Field, FieldSet, UNKNOWN, detect};
pub use error::ScheduleError;
pub use handle::{Phase, Progress, SchedulerHandle};
pub use policy::{StopCondition, StopFile, StopPolicy, Verdict};
pub use result::{RunResult, StopReason};
pub use schedule::{ROLL_FORWARD_THRESHOLD, StartPlan};
pub use scheduler::{MAX_RUN_DURATION, PollSettings, Scheduler, WAIT_STEP};
