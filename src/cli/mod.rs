//! CLI module
//!
//! Command-line interface shared by the `svc-xray` and `rest-xray` binaries.
//!
//! # Exit codes
//!
//! - `0` - success, even when some arrays were skipped
//! - `1` - configuration error
//! - `2` - the output could not be created or written

mod commands;
mod runner;

pub use commands::{CommonArgs, RestBackend, RestCli, SvcCli};
pub use runner::{collect_array, exit_code, RunSummary, Runner, EXIT_CONFIG, EXIT_OUTPUT};

use std::process::ExitCode;

/// Install the log subscriber; `debug` raises the default level
pub fn init_logging(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();
}

/// Run `runner` on a current-thread runtime and map the outcome to an exit code
pub fn execute(runner: &Runner) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(runner.run()) {
        Ok(summary) => {
            tracing::info!(
                "{} array(s) inventoried, {} skipped, {} record(s)",
                summary.collected.len(),
                summary.skipped.len(),
                summary.records
            );
            ExitCode::SUCCESS
        }
        Err(e) => ExitCode::from(exit_code(&e)),
    }
}
