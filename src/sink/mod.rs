//! Output sink subsystem.
//!
//! # Data Flow
//! ```text
//! Settings (body, headers, log destinations)
//!     → destination.rs (Destination: STDOUT | STDERR | file path)
//!     → resolver.rs (open each distinct destination once → Sink)
//!     → guard.rs (silence the log sink on a console collision)
//!     → SinkSet, shared with the dispatcher and the log subscriber
//! ```
//!
//! # Design Decisions
//! - Sinks are opened at startup, never per request
//! - Console streams are never closed; files stay open until exit
//! - No lock is held across writes from concurrent requests

pub mod destination;
pub mod guard;
pub mod resolver;

pub use destination::{ConsoleStream, Destination};
pub use guard::{check_log_collision, emit_advisory, LogRoute};
pub use resolver::{Sink, SinkRegistry, SinkSet};
