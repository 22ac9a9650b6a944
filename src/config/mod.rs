//! Configuration layer for Flight Watch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`LookupConfig`] for `status`)
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! At least one flight is required. CLI flights (`--flight`) **replace** the
//! TOML `[[flight]]` list entirely (not merged).
//!
//! # Boolean Flag Semantics
//!
//! - `--compare-route` uses OR semantics with `monitor.compare_route`.
//! - `--no-stop-on-change` disables stopping regardless of the file.
//!
//! # CLI-Only vs TOML-Only Options
//!
//! `source.timeout` and `source.user_agent` are TOML-only.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use toml::{FlightEntry, TomlConfig, default_config_template};
pub use validated::{LookupConfig, SourceSettings, ValidatedConfig, write_default_config};
