//! Process-level glue for the binary: exit codes, hints, log setup.

use flight_watch::config::ConfigError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Process exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Every flight was monitored (or the lookup printed).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Bad arguments or config file; nothing was started (1).
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Something failed after startup: a baseline or lookup fetch, a report (2).
    ///
    /// `ExitCode::from` is not `const`, hence a function.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints a follow-up hint for config errors a user can fix from the shell.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequired { .. } | ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'flight-watch init' to generate a configuration template.");
        }
        ConfigError::InvalidFlight { .. } => {
            eprintln!("\nExamples: --flight PSCBJ@14:30, --flight PSCBJ (start now)");
        }
        _ => {}
    }
}

/// Installs the global log subscriber.
///
/// INFO by default, DEBUG with `--verbose`; `RUST_LOG` overrides both.
pub fn setup_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
