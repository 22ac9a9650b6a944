//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

pub use crate::source::{DEFAULT_BASE_URL as SOURCE_BASE_URL, DEFAULT_USER_AGENT as USER_AGENT};

/// Default config file name written by `init`.
pub const CONFIG_FILE: &str = "flight-watch.toml";

/// Default lead time in minutes.
pub const LEAD_MINUTES: u64 = 15;

/// Default polling interval in seconds.
pub const INTERVAL_SECS: u64 = 30;

/// Default maximum run duration in hours.
pub const MAX_HOURS: f64 = 4.0;

/// Default stop-on-change behavior.
pub const STOP_ON_CHANGE: bool = true;

/// Default request timeout in seconds.
pub const SOURCE_TIMEOUT_SECS: u64 = 15;

/// Default polling interval as Duration.
#[must_use]
pub const fn interval() -> Duration {
    Duration::from_secs(INTERVAL_SECS)
}

/// Default lead time as Duration.
#[must_use]
pub const fn lead_time() -> Duration {
    Duration::from_secs(LEAD_MINUTES * 60)
}

/// Default request timeout as Duration.
#[must_use]
pub const fn source_timeout() -> Duration {
    Duration::from_secs(SOURCE_TIMEOUT_SECS)
}
