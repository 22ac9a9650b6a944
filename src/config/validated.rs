//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use http::HeaderValue;
use url::Url;

use crate::flight::{Target, TargetId};
use crate::monitor::{FieldSet, PollSettings};
use crate::time::parse_utc_offset;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Validated snapshot source settings.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Tracking page base URL
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: HeaderValue,
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Flights to monitor, in configuration order (at least one)
    pub targets: Vec<Target>,

    /// Polling parameters shared by all flights
    pub poll: PollSettings,

    /// Stop monitoring once this file exists
    pub stop_file: Option<PathBuf>,

    /// Fixed UTC offset for civil times; `None` means system local
    pub utc_offset: Option<FixedOffset>,

    /// Snapshot source settings
    pub source: SourceSettings,

    /// Directory for per-flight reports; `None` disables reports
    pub report_dir: Option<PathBuf>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flights: Vec<String> = self
            .targets
            .iter()
            .map(|t| match t.scheduled {
                Some(time) => format!("{}@{}", t.id, time.format("%H:%M")),
                None => format!("{}@now", t.id),
            })
            .collect();
        let offset = self
            .utc_offset
            .map_or_else(|| "local".to_string(), |o| o.to_string());
        let report_dir = self
            .report_dir
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());

        write!(
            f,
            "Config {{ flights: [{}], interval: {}s, max: {}m, stop_on_change: {}, fields: {:?}, \
             utc_offset: {}, source: {}, report_dir: {} }}",
            flights.join(", "),
            self.poll.interval().as_secs(),
            self.poll.max_duration().as_secs() / 60,
            self.poll.stop_on_change(),
            self.poll.fields(),
            offset,
            self.source.base_url,
            report_dir,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No flight is configured, or a flight is malformed or duplicated
    /// - Interval, lead time or max hours are out of range
    /// - The UTC offset, base URL or user agent is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let targets = Self::resolve_targets(cli, toml)?;
        let poll = Self::resolve_poll(cli, toml)?;
        let utc_offset = Self::resolve_offset(cli, toml)?;
        let source = Self::resolve_source(cli, toml)?;

        let stop_file = cli
            .stop_file
            .clone()
            .or_else(|| toml.and_then(|t| t.monitor.stop_file.clone()));
        let report_dir = cli
            .report_dir
            .clone()
            .or_else(|| toml.and_then(|t| t.report.dir.clone()));

        Ok(Self {
            targets,
            poll,
            stop_file,
            utc_offset,
            source,
            report_dir,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Builds the flight list. CLI flights replace TOML flights entirely.
    ///
    /// Lead time priority: `--lead` > per-flight `lead_minutes` >
    /// `monitor.lead_minutes` > default. A flight without a time starts
    /// immediately and ignores the lead time.
    fn resolve_targets(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Vec<Target>, ConfigError> {
        let global_lead = toml.and_then(|t| t.monitor.lead_minutes);

        let raw: Vec<(String, Option<String>, Option<u64>)> = if cli.flights.is_empty() {
            toml.map(|t| {
                t.flights
                    .iter()
                    .map(|f| (f.callsign.clone(), f.scheduled.clone(), f.lead_minutes))
                    .collect()
            })
            .unwrap_or_default()
        } else {
            cli.flights
                .iter()
                .map(|s| parse_flight(s).map(|(callsign, time)| (callsign, time, None)))
                .collect::<Result<_, _>>()?
        };

        if raw.is_empty() {
            return Err(ConfigError::missing(
                field::FLIGHT,
                "Use --flight CALLSIGN[@HH:MM] or add a [[flight]] table to the config file",
            ));
        }

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(raw.len());

        for (callsign, scheduled, own_lead) in raw {
            let target = match scheduled {
                Some(time) => {
                    let minutes = cli
                        .lead_minutes
                        .or(own_lead)
                        .or(global_lead)
                        .unwrap_or(defaults::LEAD_MINUTES);
                    Target::new(&callsign, &time, minutes_to_duration(minutes)?)?
                }
                None => Target::immediate(&callsign)?,
            };

            if !seen.insert(target.id.clone()) {
                return Err(ConfigError::DuplicateFlight(target.id.to_string()));
            }
            targets.push(target);
        }

        Ok(targets)
    }

    fn resolve_poll(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PollSettings, ConfigError> {
        let monitor = toml.map(|t| &t.monitor);

        // Priority: CLI explicit > TOML > default
        let interval = cli
            .interval
            .or_else(|| monitor.and_then(|m| m.interval))
            .unwrap_or(defaults::INTERVAL_SECS);

        let max_hours = cli
            .max_hours
            .or_else(|| monitor.and_then(|m| m.max_hours))
            .unwrap_or(defaults::MAX_HOURS);

        let stop_on_change = if cli.no_stop_on_change {
            false
        } else {
            monitor
                .and_then(|m| m.stop_on_change)
                .unwrap_or(defaults::STOP_ON_CHANGE)
        };

        // OR semantics: either source can enable it
        let compare_route = cli.compare_route || monitor.is_some_and(|m| m.compare_route);
        let fields = if compare_route {
            FieldSet::WithRoute
        } else {
            FieldSet::Core
        };

        let settings = PollSettings::new(Duration::from_secs(interval), hours_to_duration(max_hours)?)?
            .with_stop_on_change(stop_on_change)
            .with_fields(fields);

        Ok(settings)
    }

    fn resolve_offset(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<FixedOffset>, ConfigError> {
        let Some(value) = cli
            .utc_offset
            .as_deref()
            .or_else(|| toml.and_then(|t| t.monitor.utc_offset.as_deref()))
        else {
            return Ok(None);
        };

        parse_utc_offset(value)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidOffset {
                value: value.to_string(),
            })
    }

    fn resolve_source(cli: &Cli, toml: Option<&TomlConfig>) -> Result<SourceSettings, ConfigError> {
        let section = toml.map(|t| &t.source);

        let url_str = cli
            .source_url
            .as_deref()
            .or_else(|| section.and_then(|s| s.base_url.as_deref()))
            .unwrap_or(defaults::SOURCE_BASE_URL);

        let base_url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let timeout_secs = section
            .and_then(|s| s.timeout)
            .unwrap_or(defaults::SOURCE_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "source.timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        let agent = section
            .and_then(|s| s.user_agent.as_deref())
            .unwrap_or(defaults::USER_AGENT);
        let user_agent = HeaderValue::from_str(agent).map_err(|e| ConfigError::InvalidUserAgent {
            reason: e.to_string(),
        })?;

        Ok(SourceSettings {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }
}

/// Validated configuration for a one-shot `status` lookup.
///
/// Only the source settings apply; no flight list is needed.
#[derive(Debug)]
pub struct LookupConfig {
    /// Flight to look up
    pub target: TargetId,

    /// Fixed UTC offset for civil times; `None` means system local
    pub utc_offset: Option<FixedOffset>,

    /// Snapshot source settings
    pub source: SourceSettings,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl LookupConfig {
    /// Creates a lookup configuration from CLI arguments and optional TOML config.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is not `status`, the callsign is
    /// invalid, or the offset or source settings are invalid.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let callsign = cli
            .status_callsign()
            .ok_or_else(|| ConfigError::missing(field::FLIGHT, "Use: flight-watch status CALLSIGN"))?;

        Ok(Self {
            target: TargetId::new(callsign)?,
            utc_offset: ValidatedConfig::resolve_offset(cli, toml)?,
            source: ValidatedConfig::resolve_source(cli, toml)?,
            verbose: cli.verbose,
        })
    }

    /// Loads the optional config file named by `cli.config` and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or the
    /// merged configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = match cli.config {
            Some(ref path) => Some(TomlConfig::load(path)?),
            None => None,
        };

        Self::from_raw(cli, toml.as_ref())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Splits `CALLSIGN@HH:MM` or a bare `CALLSIGN`. The parts themselves are
/// validated by [`Target`].
fn parse_flight(value: &str) -> Result<(String, Option<String>), ConfigError> {
    match value.split_once('@') {
        None => Ok((value.trim().to_string(), None)),
        Some((_, time)) if time.contains('@') => Err(ConfigError::InvalidFlight {
            value: value.to_string(),
        }),
        Some((callsign, time)) => Ok((callsign.trim().to_string(), Some(time.trim().to_string()))),
    }
}

fn minutes_to_duration(minutes: u64) -> Result<Duration, ConfigError> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidDuration {
            field: "lead_minutes",
            reason: "value is too large".to_string(),
        })
}

fn hours_to_duration(hours: f64) -> Result<Duration, ConfigError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(ConfigError::InvalidDuration {
            field: "max_hours",
            reason: "must be a positive number".to_string(),
        });
    }

    Duration::try_from_secs_f64(hours * 3600.0).map_err(|e| ConfigError::InvalidDuration {
        field: "max_hours",
        reason: e.to_string(),
    })
}
