//! Destination descriptors.

use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::schema::{DESTINATION_STDERR, DESTINATION_STDOUT};

/// One of the two process console streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

impl ConsoleStream {
    /// The other console stream.
    pub fn other(self) -> Self {
        match self {
            ConsoleStream::Stdout => ConsoleStream::Stderr,
            ConsoleStream::Stderr => ConsoleStream::Stdout,
        }
    }

    /// Whether the stream is attached to a terminal rather than a pipe or file.
    pub fn is_terminal(self) -> bool {
        match self {
            ConsoleStream::Stdout => std::io::stdout().is_terminal(),
            ConsoleStream::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

impl std::fmt::Display for ConsoleStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsoleStream::Stdout => f.write_str(DESTINATION_STDOUT),
            ConsoleStream::Stderr => f.write_str(DESTINATION_STDERR),
        }
    }
}

/// A sink named in configuration, before it is opened.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Console(ConsoleStream),
    File(PathBuf),
}

impl Destination {
    /// Interpret a configured value. `STDOUT` and `STDERR` are matched
    /// exactly; anything else is a file path.
    pub fn parse(value: &str) -> Self {
        match value {
            DESTINATION_STDOUT => Destination::Console(ConsoleStream::Stdout),
            DESTINATION_STDERR => Destination::Console(ConsoleStream::Stderr),
            path => Destination::File(PathBuf::from(path)),
        }
    }

    pub fn console_stream(&self) -> Option<ConsoleStream> {
        match self {
            Destination::Console(stream) => Some(*stream),
            Destination::File(_) => None,
        }
    }

    /// Whether writing both destinations would interleave on one console
    /// stream. Files never collide, not even with the same path.
    pub fn collides_with(&self, other: &Destination) -> bool {
        match (self.console_stream(), other.console_stream()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Console(stream) => write!(f, "{}", stream),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}
