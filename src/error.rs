//! Startup and lifecycle errors.
//!
//! Only these errors may terminate the process. Failures while capturing a
//! single request are logged by the dispatcher and never surface here.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum TapError {
    #[error("Could not parse configuration: {0}")]
    Config(#[from] ConfigError),

    /// A file destination could not be created for writing.
    #[error("Could not open {} for writing: {source}", .path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not bind listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The serve task ended without being asked to.
    #[error("HTTP server crashed: {0}")]
    Server(std::io::Error),

    #[error("Could not shut down server gracefully within {0:?}")]
    ShutdownTimeout(Duration),
}

impl TapError {
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::SinkOpen { .. } => "sink_open_error",
            Self::Bind { .. } => "bind_error",
            Self::Server(_) => "server_error",
            Self::ShutdownTimeout(_) => "shutdown_timeout",
        }
    }

    /// Process exit status for this failure. Zero is reserved for a clean
    /// shutdown.
    pub const fn exit_code(&self) -> u8 {
        1
    }
}
