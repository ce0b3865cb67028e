//! Configuration validation.
//!
//! # Responsibilities
//! - Parse the interface as an IPv4/IPv6 literal
//! - Turn destination strings into [`Destination`] values
//! - Reject empty body/log destinations; an empty headers destination is unset
//!
//! # Design Decisions
//! - Validation is a pure function: `&TapConfig → Result<Settings, ConfigError>`
//! - Runs before any sink is opened

use std::net::{IpAddr, SocketAddr};

use crate::config::loader::ConfigError;
use crate::config::schema::{Settings, TapConfig};
use crate::sink::Destination;

/// Validate a configuration and produce the immutable [`Settings`].
pub fn validate_config(config: &TapConfig) -> Result<Settings, ConfigError> {
    let ip = parse_interface(&config.listener.interface)?;

    let body = required_destination("body", &config.output.body)?;
    let log = required_destination("log", &config.output.log)?;
    let headers = if config.output.headers.is_empty() {
        None
    } else {
        Some(Destination::parse(&config.output.headers))
    };

    Ok(Settings {
        bind_address: SocketAddr::new(ip, config.listener.port),
        body,
        headers,
        log,
        body_delimiter: config.output.body_delimiter.as_bytes().to_vec(),
        verbosity: config.logging.verbosity,
    })
}

fn parse_interface(interface: &str) -> Result<IpAddr, ConfigError> {
    interface
        .parse()
        .map_err(|_| ConfigError::InvalidInterface(interface.to_string()))
}

fn required_destination(stream: &'static str, value: &str) -> Result<Destination, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyDestination(stream));
    }
    Ok(Destination::parse(value))
}
