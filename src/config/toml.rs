//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Flights to monitor (`[[flight]]` tables)
    #[serde(default, rename = "flight")]
    pub flights: Vec<FlightEntry>,

    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Snapshot source configuration
    #[serde(default)]
    pub source: SourceSection,

    /// Report output configuration
    #[serde(default)]
    pub report: ReportSection,
}

/// One `[[flight]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlightEntry {
    /// Flight callsign or registration
    pub callsign: String,

    /// Scheduled time as `HH:MM`; omit to start polling immediately
    pub scheduled: Option<String>,

    /// Lead time override for this flight, in minutes
    pub lead_minutes: Option<u64>,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Minutes before the scheduled time to start polling
    pub lead_minutes: Option<u64>,

    /// Polling interval in seconds
    pub interval: Option<u64>,

    /// Maximum monitoring time in hours
    pub max_hours: Option<f64>,

    /// Stop at the first detected change
    pub stop_on_change: Option<bool>,

    /// Also compare origin and destination
    #[serde(default)]
    pub compare_route: bool,

    /// Stop monitoring once this file exists
    pub stop_file: Option<PathBuf>,

    /// UTC offset of scheduled times, e.g. "-03:00"
    pub utc_offset: Option<String>,
}

/// Snapshot source configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    /// Tracking page base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,

    /// User-Agent header value
    pub user_agent: Option<String>,
}

/// Report output configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    /// Directory for per-flight JSON reports
    pub dir: Option<PathBuf>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Flight Watch Configuration File

# Flights to monitor. Repeat the [[flight]] table for each one.
# Note: --flight on the command line REPLACES this list entirely.
[[flight]]
callsign = "PSCBJ"
scheduled = "14:30"   # omit to start polling immediately
# lead_minutes = 30   # overrides monitor.lead_minutes for this flight

[monitor]
# Minutes before the scheduled time to start polling (default: 15)
lead_minutes = 15

# Polling interval in seconds (default: 30)
interval = 30

# Maximum monitoring time in hours, fractional allowed (default: 4.0)
max_hours = 4.0

# Stop at the first detected change (default: true)
# stop_on_change = true

# Also report origin and destination changes (default: false)
# compare_route = false

# Stop monitoring once this file exists
# stop_file = "/tmp/flight-watch.stop"

# UTC offset of scheduled times (default: system local offset)
# utc_offset = "-03:00"

[source]
# Tracking page base URL; the callsign is appended
# base_url = "https://www.flightaware.com/live/flight/"

# Request timeout in seconds (default: 15)
# timeout = 15

# User-Agent header (default: a desktop browser)
# user_agent = "Mozilla/5.0"

[report]
# Directory for per-flight JSON reports (log_CALLSIGN.json)
# dir = "reports"
"#
    .to_string()
}
