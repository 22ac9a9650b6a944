//! Terminal outcome of a monitoring run.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

use super::Change;
use crate::flight::{Snapshot, TargetId};

/// Why a monitoring run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The external stop condition reported true.
    ConditionMet,
    /// Stop-on-change was set and a tick produced changes.
    ChangeDetected,
    /// The maximum run duration elapsed.
    Timeout,
    /// A stop was requested while waiting or polling.
    UserCancelled,
    /// The baseline fetch failed.
    Error,
    /// A stop was requested before the run began waiting.
    CancelledBeforeStart,
}

impl StopReason {
    /// Returns the machine-readable reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConditionMet => "condition_met",
            Self::ChangeDetected => "change_detected",
            Self::Timeout => "timeout",
            Self::UserCancelled => "user_cancelled",
            Self::Error => "error",
            Self::CancelledBeforeStart => "cancelled_before_start",
        }
    }

    /// Returns true if the run ended because a stop was requested.
    #[must_use]
    pub const fn is_cancellation(self) -> bool {
        matches!(self, Self::UserCancelled | Self::CancelledBeforeStart)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of one monitoring run.
///
/// Produced exactly once, when the run stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// The monitored flight.
    pub target: TargetId,
    /// Why monitoring ended.
    pub reason: StopReason,
    /// The last known-good snapshot, if any fetch succeeded.
    pub final_snapshot: Option<Snapshot>,
    /// Every change detected during the run, in detection order.
    pub changes: Vec<Change>,
    /// Failure detail when `reason` is [`StopReason::Error`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Civil time at which polling began, if it did.
    pub started_at: Option<DateTime<FixedOffset>>,
    /// Time spent polling (zero if polling never began).
    #[serde(rename = "duration_seconds", serialize_with = "as_seconds")]
    pub elapsed: Duration,
    /// Fetch attempts made, including the baseline and failed attempts.
    pub ticks: u32,
}

impl RunResult {
    /// Returns true if the run ended without monitoring anything useful.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.reason, StopReason::Error)
    }
}

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_render_snake_case() {
        assert_eq!(StopReason::ChangeDetected.to_string(), "change_detected");
        assert_eq!(
            StopReason::CancelledBeforeStart.to_string(),
            "cancelled_before_start"
        );
    }

    #[test]
    fn serialized_reason_matches_display() {
        for reason in [
            StopReason::ConditionMet,
            StopReason::ChangeDetected,
            StopReason::Timeout,
            StopReason::UserCancelled,
            StopReason::Error,
            StopReason::CancelledBeforeStart,
        ] {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{reason}\""));
        }
    }

    #[test]
    fn cancellation_reasons() {
        assert!(StopReason::UserCancelled.is_cancellation());
        assert!(StopReason::CancelledBeforeStart.is_cancellation());
        assert!(!StopReason::Timeout.is_cancellation());
    }

    #[test]
    fn result_serializes_duration_as_seconds() {
        let result = RunResult {
            target: TargetId::new("PSCBJ").unwrap(),
            reason: StopReason::Timeout,
            final_snapshot: None,
            changes: vec![],
            error: None,
            started_at: None,
            elapsed: Duration::from_millis(1500),
            ticks: 3,
        };

        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["duration_seconds"], 1.5);
        assert_eq!(value["reason"], "timeout");
        assert_eq!(value["target"], "PSCBJ");
        assert!(value.get("error").is_none());
        assert!(!result.is_failure());
    }
}
