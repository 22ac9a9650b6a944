//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait that yields the current civil
//! (wall-clock) time with its UTC offset. Production code uses
//! [`SystemClock`]; tests inject clocks driven by tokio's paused time.

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Abstraction over wall-clock time for testability.
///
/// Scheduled event times are civil `HH:MM` values, so the clock reports a
/// timezone-aware instant. Implementations must be cheap to call; the
/// scheduler reads the clock at least once per second while waiting.
///
/// # Example
///
/// ```
/// use flight_watch::time::{Clock, SystemClock};
///
/// let clock = SystemClock::local();
/// let now = clock.now();
/// assert!(now.timestamp() > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current civil time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Production clock using actual system time.
///
/// Without an explicit offset the system's local offset is used, resolved
/// on every call so that DST transitions are picked up.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Creates a clock reporting the system's local time.
    #[must_use]
    pub const fn local() -> Self {
        Self { offset: None }
    }

    /// Creates a clock reporting civil time at a fixed UTC offset.
    #[must_use]
    pub const fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// Returns the fixed offset, if one was configured.
    #[must_use]
    pub const fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// Parses a UTC offset such as `-03:00` or `+05:30`.
///
/// Returns `None` for anything that is not a valid offset.
#[must_use]
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    value.trim().parse::<FixedOffset>().ok()
}
