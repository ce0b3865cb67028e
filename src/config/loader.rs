//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::TapConfig;

/// Error type for configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not parse interface as IP interface={0}")]
    InvalidInterface(String),

    #[error("The {0} destination must not be empty")]
    EmptyDestination(&'static str),
}

/// Load configuration from a TOML file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<TapConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: TapConfig = toml::from_str(&content)?;
    Ok(config)
}
