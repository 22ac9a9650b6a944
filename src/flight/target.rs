//! Monitored flight identity and schedule.

use std::fmt;
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::monitor::ScheduleError;

/// Longest accepted lead time (7 days).
pub const MAX_LEAD_TIME: Duration = Duration::from_secs(7 * 24 * 3600);

/// Canonical identifier of a monitored flight (its callsign).
///
/// Always trimmed and uppercase, so `pscbj` and ` PSCBJ ` name the same target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Normalizes and validates a raw callsign.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::EmptyTarget`] for blank input and
    /// [`ScheduleError::InvalidTarget`] when the callsign contains characters
    /// that cannot appear in a tracking page path.
    pub fn new(raw: &str) -> Result<Self, ScheduleError> {
        let normalized = raw.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(ScheduleError::EmptyTarget);
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ScheduleError::InvalidTarget(raw.to_string()));
        }

        Ok(Self(normalized))
    }

    /// Returns the canonical callsign.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flight to monitor: who, when, and how early to begin polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Canonical callsign.
    pub id: TargetId,
    /// Scheduled event time as local civil time (today or next occurrence).
    /// `None` starts polling as soon as the run begins.
    pub scheduled: Option<NaiveTime>,
    /// How long before `scheduled` polling should begin.
    pub lead_time: Duration,
}

impl Target {
    /// Creates a target from a raw callsign and an `HH:MM` scheduled time.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if the callsign is invalid, the time is not
    /// `HH:MM`, or the lead time exceeds [`MAX_LEAD_TIME`].
    pub fn new(callsign: &str, scheduled: &str, lead_time: Duration) -> Result<Self, ScheduleError> {
        let id = TargetId::new(callsign)?;
        let scheduled = parse_civil_time(scheduled)?;

        if lead_time > MAX_LEAD_TIME {
            return Err(ScheduleError::InvalidDuration {
                field: "lead_time",
                reason: format!("must be at most {} days", MAX_LEAD_TIME.as_secs() / 86_400),
            });
        }

        Ok(Self {
            id,
            scheduled: Some(scheduled),
            lead_time,
        })
    }

    /// Creates a target with no schedule, polled from the moment the run starts.
    ///
    /// # Errors
    ///
    /// Returns a [`ScheduleError`] if the callsign is invalid.
    pub fn immediate(callsign: &str) -> Result<Self, ScheduleError> {
        Ok(Self {
            id: TargetId::new(callsign)?,
            scheduled: None,
            lead_time: Duration::ZERO,
        })
    }
}

/// Parses an `HH:MM` civil time.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidTime`] if the value is not a valid 24-hour time.
pub fn parse_civil_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ScheduleError::InvalidTime {
        value: value.to_string(),
    })
}
