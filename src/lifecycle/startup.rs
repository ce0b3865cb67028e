//! Startup and the running-server handle.
//!
//! # Responsibilities
//! - Bind the listener on the configured interface and port
//! - Spawn the serve task so the caller's path stays free
//! - Drive the bounded-time drain when shutdown is requested
//!
//! # Design Decisions
//! - Fail fast: a bind error is fatal and nothing is served
//! - Sinks are resolved before this point; the listener starts last
//! - An expired deadline aborts the serve task and fails the shutdown

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::error::TapError;
use crate::http::TapServer;
use crate::lifecycle::inflight::InFlightTracker;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::state::{LifecycleState, StateCell};
use crate::sink::SinkSet;

/// Bind the listener and start serving in the background.
pub async fn start(settings: &Settings, sinks: &SinkSet) -> Result<RunningServer, TapError> {
    let state = StateCell::new();
    let addr = settings.bind_address;

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(source) => {
            let err = TapError::Bind { addr, source };
            tracing::error!(
                address = %addr,
                error_type = err.error_type(),
                error = %err,
                "Could not bind listener"
            );
            state.transition(LifecycleState::Stopped);
            return Err(err);
        }
    };
    let local_addr = listener
        .local_addr()
        .map_err(|source| TapError::Bind { addr, source })?;

    let server = TapServer::new(settings, sinks);
    let in_flight = server.in_flight();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(server.run(listener, shutdown.notified()));

    state.transition(LifecycleState::Listening);
    tracing::info!(address = %local_addr, "Listening for requests");

    Ok(RunningServer {
        local_addr,
        state,
        shutdown,
        in_flight,
        task,
    })
}

/// Handle to a server accepting requests.
pub struct RunningServer {
    local_addr: SocketAddr,
    state: StateCell,
    shutdown: Shutdown,
    in_flight: InFlightTracker,
    task: JoinHandle<io::Result<()>>,
}

impl RunningServer {
    /// Address actually bound; differs from the configured one for port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    pub fn in_flight(&self) -> &InFlightTracker {
        &self.in_flight
    }

    /// Block until `signal` resolves while requests are served.
    ///
    /// Fails if the serve task ends first.
    pub async fn wait_for<F>(&mut self, signal: F) -> Result<(), TapError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            () = signal => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            joined = &mut self.task => {
                let error = match joined {
                    Ok(Ok(())) => io::Error::other("server exited without a shutdown request"),
                    Ok(Err(e)) => e,
                    Err(e) => io::Error::other(e),
                };
                let err = TapError::Server(error);
                tracing::error!(
                    error_type = err.error_type(),
                    error = %err,
                    "HTTP server crashed"
                );
                self.state.transition(LifecycleState::Stopped);
                Err(err)
            }
        }
    }

    /// Stop accepting, let in-flight requests finish, and wait at most
    /// `deadline` for that to happen.
    pub async fn shutdown(mut self, deadline: Duration) -> Result<(), TapError> {
        self.state.transition(LifecycleState::ShuttingDown);
        tracing::info!(
            in_flight = self.in_flight.active_count(),
            deadline_secs = deadline.as_secs_f64(),
            "Draining in-flight requests"
        );
        self.shutdown.trigger();

        let outcome = tokio::time::timeout(deadline, &mut self.task).await;
        let result = match outcome {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(TapError::Server(e)),
            Ok(Err(e)) => Err(TapError::Server(io::Error::other(e))),
            Err(_) => {
                self.task.abort();
                Err(TapError::ShutdownTimeout(deadline))
            }
        };
        if let Err(err) = &result {
            tracing::error!(
                in_flight = self.in_flight.active_count(),
                error_type = err.error_type(),
                error = %err,
                "Could not shutdown server gracefully"
            );
        }

        self.state.transition(LifecycleState::Stopped);
        result
    }
}
