//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// Flight Watch: scheduled flight status monitor
///
/// Waits until shortly before each flight's scheduled time, then polls its
/// tracking page and reports takeoff, landing and status changes.
#[derive(Debug, Parser)]
#[command(name = "flight-watch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Flight to monitor as CALLSIGN@HH:MM, or CALLSIGN to start now (repeatable)
    #[arg(long = "flight", value_name = "CALLSIGN[@HH:MM]")]
    pub flights: Vec<String>,

    /// Minutes before the scheduled time to start polling
    #[arg(long = "lead", value_name = "MINUTES")]
    pub lead_minutes: Option<u64>,

    /// Polling interval in seconds
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Maximum monitoring time in hours (fractional allowed)
    #[arg(long = "max-hours", value_name = "HOURS", allow_negative_numbers = true)]
    pub max_hours: Option<f64>,

    /// Keep polling after the first detected change
    #[arg(long = "no-stop-on-change")]
    pub no_stop_on_change: bool,

    /// Also report origin and destination changes
    #[arg(long = "compare-route")]
    pub compare_route: bool,

    /// Stop monitoring once this file exists
    #[arg(long = "stop-file", value_name = "PATH")]
    pub stop_file: Option<PathBuf>,

    /// UTC offset of scheduled times, e.g. -03:00 (default: system local)
    #[arg(long = "utc-offset", value_name = "OFFSET", allow_hyphen_values = true)]
    pub utc_offset: Option<String>,

    /// Tracking page base URL; the callsign is appended
    #[arg(long = "source-url", value_name = "URL")]
    pub source_url: Option<String>,

    /// Directory for per-flight JSON reports
    #[arg(long = "report-dir", value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for flight-watch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Fetch a flight once and print its current state
    Status {
        /// Flight callsign or registration
        callsign: String,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns the callsign of a `status` lookup, if this is one.
    #[must_use]
    pub fn status_callsign(&self) -> Option<&str> {
        match &self.command {
            Some(Command::Status { callsign }) => Some(callsign),
            _ => None,
        }
    }
}
