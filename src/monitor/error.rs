//! Error types for the monitor layer.

use thiserror::Error;

/// Error type for building a monitoring run.
///
/// Raised while constructing targets and poll settings, before anything is
/// scheduled. A run that was constructed successfully never produces one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// The target identifier was blank.
    #[error("Target identifier must not be empty")]
    EmptyTarget,

    /// The target identifier contains unsupported characters.
    #[error("Invalid target identifier '{0}': only letters, digits, '-' and '_' are allowed")]
    InvalidTarget(String),

    /// The scheduled time is not a valid `HH:MM` civil time.
    #[error("Invalid scheduled time '{value}': expected HH:MM")]
    InvalidTime {
        /// The rejected value
        value: String,
    },

    /// A duration is zero, negative, or out of range.
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_target_displays_message() {
        assert_eq!(
            ScheduleError::EmptyTarget.to_string(),
            "Target identifier must not be empty"
        );
    }

    #[test]
    fn invalid_time_displays_value() {
        let error = ScheduleError::InvalidTime {
            value: "7pm".to_string(),
        };
        assert!(error.to_string().contains("'7pm'"));
        assert!(error.to_string().contains("HH:MM"));
    }

    #[test]
    fn invalid_duration_displays_field_and_reason() {
        let error = ScheduleError::InvalidDuration {
            field: "interval",
            reason: "must be greater than 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid duration for interval: must be greater than 0"
        );
    }
}
