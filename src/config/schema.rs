//! Configuration schema definitions.
//!
//! [`TapConfig`] mirrors the optional TOML file and the command-line flags;
//! every field has a default. [`Settings`] is the validated form the rest of
//! the program reads.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::sink::Destination;

/// Name of the standard output console stream as a destination.
pub const DESTINATION_STDOUT: &str = "STDOUT";
/// Name of the standard error console stream as a destination.
pub const DESTINATION_STDERR: &str = "STDERR";

/// Root configuration, as read from a file and overridden by flags.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct TapConfig {
    /// Where to listen.
    pub listener: ListenerConfig,

    /// Where captured request data goes.
    pub output: OutputConfig,

    /// Log verbosity.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP literal of the interface to bind (e.g., "127.0.0.1", "::1").
    pub interface: String,

    /// TCP port. 0 asks the OS for an ephemeral port.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            interface: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Output destinations. Each is `STDOUT`, `STDERR` or a file path.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination for request bodies.
    pub body: String,

    /// Written after every captured body.
    pub body_delimiter: String,

    /// Destination for request headers. Empty means unset.
    pub headers: String,

    /// Destination for log records.
    pub log: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            body: DESTINATION_STDOUT.to_string(),
            body_delimiter: "\n".to_string(),
            headers: String::new(),
            log: DESTINATION_STDERR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum severity. `None` disables logging.
    pub verbosity: Option<Verbosity>,
}

/// Minimum log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, immutable configuration.
///
/// Built once at startup by [`crate::config::validate_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Interface and port to bind.
    pub bind_address: SocketAddr,

    /// Body destination.
    pub body: Destination,

    /// Headers destination, if configured.
    pub headers: Option<Destination>,

    /// Log destination.
    pub log: Destination,

    /// Bytes written after each body.
    pub body_delimiter: Vec<u8>,

    /// Minimum log severity; `None` when logging is disabled.
    pub verbosity: Option<Verbosity>,
}
