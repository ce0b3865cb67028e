//! `http-tap` binary.
//!
//! Parses flags, resolves the output sinks, installs logging, and serves
//! until interrupted.

use std::process::ExitCode;

use clap::Parser;

use http_tap::config::{validate_config, CliArgs, Settings};
use http_tap::error::TapError;
use http_tap::lifecycle;
use http_tap::observability::init_logging;
use http_tap::sink::{guard, SinkSet};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // The log sink does not exist yet, so startup failures go to stderr.
    let settings = match load_settings(args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("http-tap: {e}");
            return ExitCode::from(e.exit_code());
        }
    };
    let sinks = match SinkSet::open(&settings) {
        Ok(sinks) => sinks,
        Err(e) => {
            eprintln!("http-tap: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    guard::emit_advisory(sinks.log_route, &settings.body, settings.headers.as_ref());
    if let Err(e) = init_logging(settings.verbosity, &sinks.log) {
        eprintln!("http-tap: could not install logger: {e}");
    }

    let headers_destination = settings
        .headers
        .as_ref()
        .map_or_else(|| "unset".to_string(), ToString::to_string);
    tracing::info!(
        body_destination = %settings.body,
        headers_destination = %headers_destination,
        log_destination = %settings.log,
        "Initialization finished"
    );

    // Registered before the listener is bound so an early interrupt still
    // goes through the graceful path.
    let signal = lifecycle::shutdown_signal();
    match lifecycle::run(&settings, &sinks, signal).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        // Already logged by the lifecycle manager.
        Err(e) => ExitCode::from(e.exit_code()),
    }
}

fn load_settings(args: CliArgs) -> Result<Settings, TapError> {
    let config = args.into_config()?;
    Ok(validate_config(&config)?)
}
