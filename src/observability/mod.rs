//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup, lifecycle and dispatcher produce:
//!     → tracing events (structured key/value fields)
//!     → logging.rs (global subscriber, level filter)
//!     → the guarded log sink (console, file, or discarded)
//! ```
//!
//! # Design Decisions
//! - Request bytes never pass through the logger
//! - The log writer is chosen once, after the collision guard has run

pub mod logging;

pub use logging::init_logging;
