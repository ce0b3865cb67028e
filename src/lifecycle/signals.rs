//! OS signal handling.
//!
//! # Responsibilities
//! - Register for SIGINT (Ctrl+C) and, on Unix, SIGTERM
//! - Resolve exactly once; the caller starts the shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are installed when `shutdown_signal` is called, not when the
//!   future is first polled, so a signal arriving during startup is not lost
//! - A handler that cannot be installed never fires, rather than firing early

use std::future::Future;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Install the handlers and return a future that resolves when the process
/// is asked to stop. Must be called inside the runtime.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    let interrupt = install(SignalKind::interrupt(), "SIGINT");
    let terminate = install(SignalKind::terminate(), "SIGTERM");

    async move {
        tokio::select! {
            () = recv(interrupt) => {
                tracing::info!("Received SIGINT");
            }
            () = recv(terminate) => {
                tracing::info!("Received SIGTERM");
            }
        }
    }
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C");
    }
}

#[cfg(unix)]
fn install(kind: SignalKind, name: &'static str) -> Option<Signal> {
    match signal(kind) {
        Ok(signal) => Some(signal),
        Err(e) => {
            tracing::error!(signal = name, error = %e, "Failed to install signal handler");
            None
        }
    }
}

#[cfg(unix)]
async fn recv(signal: Option<Signal>) {
    match signal {
        Some(mut signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}
