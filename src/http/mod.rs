//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, any method, any path)
//!     → request.rs (request ID, method/path/arrival time)
//!     → dispatcher.rs (headers → headers sink, body → body sink, delimiter)
//!     → default empty 200 response
//! ```

pub mod dispatcher;
pub mod request;
pub mod server;

pub use dispatcher::{capture_handler, dispatch, CaptureError, CaptureReport, CaptureState};
pub use request::{RequestContext, X_REQUEST_ID};
pub use server::TapServer;
