//! Structured logging.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber
//! - Route log records to the guarded log sink
//! - Apply the configured minimum severity
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logging is off unless a verbosity is configured; `RUST_LOG` overrides
//! - ANSI colouring only when the log stream is a terminal

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Verbosity;
use crate::sink::Sink;

/// Filter directive for a configured verbosity.
pub fn filter_directive(verbosity: Option<Verbosity>) -> &'static str {
    verbosity.map_or("off", |v| v.as_str())
}

/// Colour escapes are only written to an interactive console. Files, pipes
/// and the discard sink get plain text.
pub fn use_ansi(sink: &Sink) -> bool {
    sink.destination()
        .and_then(|d| d.console_stream())
        .is_some_and(|stream| stream.is_terminal())
}

/// Install the global subscriber writing to `sink`.
pub fn init_logging(
    verbosity: Option<Verbosity>,
    sink: &Sink,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity))),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(sink.make_writer())
                .with_ansi(use_ansi(sink)),
        )
        .try_init()
}
