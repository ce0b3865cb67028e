//! HTTP request tap.
//!
//! Binds an HTTP listener and, for every request, streams the body to a
//! console stream or file followed by a delimiter. Headers can be captured to
//! a separate destination; logs go to a third one.
//!
//! # Architecture Overview
//!
//! ```text
//!   config ──▶ sink::resolver ──▶ sink::guard ──▶ observability (log sink)
//!                    │
//!                    ▼
//!   client ──▶ http::server ──▶ http::dispatcher ──▶ body / headers sinks
//!                    ▲
//!   signal ──▶ lifecycle (start → listen → drain ≤ 5s → stop)
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sink;

pub use config::{Settings, TapConfig};
pub use error::TapError;
pub use http::TapServer;
pub use lifecycle::Shutdown;
pub use sink::{Destination, SinkSet};
