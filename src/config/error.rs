//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::monitor::ScheduleError;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// A `--flight` value is neither `CALLSIGN` nor `CALLSIGN@HH:MM`.
    #[error("Invalid flight '{value}': expected CALLSIGN or CALLSIGN@HH:MM")]
    InvalidFlight {
        /// The rejected value
        value: String,
    },

    /// The same callsign was configured twice.
    #[error("Flight '{0}' is configured more than once")]
    DuplicateFlight(String),

    /// A flight or poll setting failed validation.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Invalid URL provided.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid UTC offset.
    #[error("Invalid UTC offset '{value}': expected +HH:MM or -HH:MM")]
    InvalidOffset {
        /// The invalid value provided
        value: String,
    },

    /// Invalid duration value (zero, negative, or too large).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// The user agent cannot be sent as a header value.
    #[error("Invalid user agent: {reason}")]
    InvalidUserAgent {
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for `MissingRequired` errors.
pub mod field {
    /// The flight list.
    pub const FLIGHT: &str = "flight";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
