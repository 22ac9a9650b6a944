//! Command-line front end of flight-watch.
//!
//! Dispatches to `init`, the one-shot `status` lookup, or monitoring.

use flight_watch::config::{Cli, Command, LookupConfig, ValidatedConfig, write_default_config};
use std::future::Future;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Parses the command line and picks a mode.
///
/// Not covered by tests: every branch hands off to a tested component.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match &cli.command {
        Some(Command::Init { output }) => return handle_init(output),
        Some(Command::Status { .. }) => return handle_status(&cli),
        None => {}
    }

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    tracing::info!("{config}");

    block_on(run::execute(config))
}

/// Writes the config template for `init`.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Fetches one flight and prints it, for `status`.
#[cfg(not(tarpaulin_include))]
fn handle_status(cli: &Cli) -> ExitCode {
    let config = match LookupConfig::load(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    block_on(run::lookup(config))
}

/// Drives `task` on a fresh Tokio runtime and maps its outcome to an exit code.
///
/// Not covered by tests: needs a real runtime.
#[cfg(not(tarpaulin_include))]
fn block_on(task: impl Future<Output = Result<(), run::RunError>>) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Cannot start the async runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(task) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("flight-watch failed: {e}");
            exit_code::runtime_error()
        }
    }
}
