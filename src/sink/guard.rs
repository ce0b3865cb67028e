//! Log sink conflict guard.
//!
//! Structured log lines written to the same console stream as raw request
//! bytes would corrupt both, so a log destination that collides with the body
//! or headers destination is replaced by a discarding sink for the whole run.

use std::io::{self, Write};

use crate::sink::destination::{ConsoleStream, Destination};

/// Outcome of the collision check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRoute {
    /// Logs go to the configured destination.
    Active,
    /// Logs are discarded because `stream` also carries request output.
    Silenced { stream: ConsoleStream },
}

impl LogRoute {
    pub fn is_silenced(&self) -> bool {
        matches!(self, LogRoute::Silenced { .. })
    }
}

/// Decide whether the log sink must be silenced.
///
/// Runs once at startup, after all destinations are resolved.
pub fn check_log_collision(
    body: &Destination,
    headers: Option<&Destination>,
    log: &Destination,
) -> LogRoute {
    let collides = log.collides_with(body) || headers.is_some_and(|h| log.collides_with(h));
    match (collides, log.console_stream()) {
        (true, Some(stream)) => LogRoute::Silenced { stream },
        _ => LogRoute::Active,
    }
}

/// The console stream free of request output, if there is one, for a
/// one-time notice that logging was silenced.
pub fn advisory_stream(
    route: LogRoute,
    body: &Destination,
    headers: Option<&Destination>,
) -> Option<ConsoleStream> {
    let LogRoute::Silenced { stream } = route else {
        return None;
    };
    let free = stream.other();
    let in_use = |d: &Destination| d.console_stream() == Some(free);
    if in_use(body) || headers.is_some_and(in_use) {
        None
    } else {
        Some(free)
    }
}

/// Write the silenced-logging notice to the free console stream, if any.
pub fn emit_advisory(route: LogRoute, body: &Destination, headers: Option<&Destination>) {
    let (Some(free), LogRoute::Silenced { stream }) = (advisory_stream(route, body, headers), route)
    else {
        return;
    };
    let line = format!(
        "http-tap: logging disabled because the log destination {stream} \
         also receives request output\n"
    );
    // Best effort; there is nowhere else to report a failure.
    let _ = match free {
        ConsoleStream::Stdout => io::stdout().lock().write_all(line.as_bytes()),
        ConsoleStream::Stderr => io::stderr().lock().write_all(line.as_bytes()),
    };
}
