//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings + SinkSet → bind listener → spawn serve task → Listening
//!
//! Running:
//!     main path waits on signals.rs; requests are served concurrently
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop accepting → drain in-flight (≤ 5s) → Stopped
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config, then sinks, then the listener
//! - Shutdown has a deadline; missing it is a failure
//! - No restart or reload

pub mod inflight;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

use std::future::Future;

use crate::config::Settings;
use crate::error::TapError;
use crate::sink::SinkSet;

pub use inflight::{InFlightGuard, InFlightTracker};
pub use shutdown::{Shutdown, SHUTDOWN_DEADLINE};
pub use signals::shutdown_signal;
pub use startup::{start, RunningServer};
pub use state::LifecycleState;

/// Serve until `signal` resolves, then shut down within
/// [`SHUTDOWN_DEADLINE`].
pub async fn run<F>(settings: &Settings, sinks: &SinkSet, signal: F) -> Result<(), TapError>
where
    F: Future<Output = ()>,
{
    let mut server = start(settings, sinks).await?;
    server.wait_for(signal).await?;
    server.shutdown(SHUTDOWN_DEADLINE).await
}
