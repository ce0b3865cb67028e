//! Command-line flags.
//!
//! Every flag is optional so that an explicit flag can be told apart from a
//! default. Flags override the config file, which overrides the defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{TapConfig, Verbosity};

#[derive(Parser, Debug, Default)]
#[command(name = "http-tap")]
#[command(
    about = "Write the bodies of incoming HTTP requests to a stream or file",
    long_about = None
)]
pub struct CliArgs {
    /// TOML config file; flags given on the command line take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to bind to [default: 8080]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Network interface to bind to [default: 127.0.0.1]
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Where to write the request body. Valid options are STDOUT, STDERR or a
    /// path to a file [default: STDOUT]
    #[arg(short, long)]
    pub body: Option<String>,

    /// What to write after writing the request body [default: newline]
    #[arg(long = "bdelim")]
    pub body_delimiter: Option<String>,

    /// Where to write the request headers. Valid options are STDOUT, STDERR or
    /// a path to a file
    #[arg(short = 'H', long)]
    pub headers: Option<String>,

    /// Where to write logs. Logs are discarded if the same console stream is
    /// used for bodies or headers. Valid options are STDOUT, STDERR or a path
    /// to a file [default: STDERR]
    #[arg(short, long)]
    pub log: Option<String>,

    /// Logging verbosity; logging is disabled when unset
    #[arg(long, value_enum)]
    pub verbosity: Option<Verbosity>,
}

impl CliArgs {
    /// Build the merged configuration: defaults, then the config file (if
    /// any), then explicit flags.
    pub fn into_config(self) -> Result<TapConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => TapConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(self, config: &mut TapConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(interface) = self.interface {
            config.listener.interface = interface;
        }
        if let Some(body) = self.body {
            config.output.body = body;
        }
        if let Some(delimiter) = self.body_delimiter {
            config.output.body_delimiter = delimiter;
        }
        if let Some(headers) = self.headers {
            config.output.headers = headers;
        }
        if let Some(log) = self.log {
            config.output.log = log;
        }
        if self.verbosity.is_some() {
            config.logging.verbosity = self.verbosity;
        }
    }
}
