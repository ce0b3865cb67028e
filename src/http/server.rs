//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router: every method and path goes to the capture handler
//! - Wire up the request ID layers
//! - Serve on an already-bound listener until the shutdown future resolves

use std::future::Future;

use axum::{routing::any, Router};
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::http::dispatcher::{capture_handler, CaptureState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::InFlightTracker;
use crate::sink::SinkSet;

/// HTTP server that captures request bodies.
pub struct TapServer {
    router: Router,
    in_flight: InFlightTracker,
}

impl TapServer {
    /// Create a server writing to the given sinks.
    pub fn new(settings: &Settings, sinks: &SinkSet) -> Self {
        let in_flight = InFlightTracker::new();
        let state = CaptureState::new(settings, sinks, in_flight.clone());
        Self {
            router: Self::build_router(state),
            in_flight,
        }
    }

    fn build_router(state: CaptureState) -> Router {
        Router::new()
            .route("/{*path}", any(capture_handler))
            .route("/", any(capture_handler))
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Captures currently in progress.
    pub fn in_flight(&self) -> InFlightTracker {
        self.in_flight.clone()
    }

    /// Serve until `shutdown` resolves, then drain open connections.
    ///
    /// Returns once every in-flight request has finished.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::debug!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::debug!("HTTP server stopped");
        Ok(())
    }
}
