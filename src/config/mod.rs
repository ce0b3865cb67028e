//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (TapConfig::default)
//!     → loader.rs (optional TOML file, `--config`)
//!     → cli.rs (explicit command-line flags win)
//!     → validation.rs (interface literal, destinations)
//!     → Settings (validated, immutable)
//!     → handed to sink resolution and the lifecycle manager
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once validated; there is no reload
//! - All file fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde/clap) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::CliArgs;
pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, LoggingConfig, OutputConfig, Settings, TapConfig, Verbosity};
pub use validation::validate_config;
