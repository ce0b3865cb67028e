//! In-flight request tracking.
//!
//! # Responsibilities
//! - Count requests currently being captured
//! - Release the count when a capture finishes, even on panic
//! - Report how much work a shutdown has to drain

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global atomic counter for request IDs used in trace output.
/// Relaxed ordering is enough since only uniqueness matters.
static CAPTURE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique sequence number of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(u64);

impl CaptureId {
    pub fn new() -> Self {
        Self(CAPTURE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CaptureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CaptureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "capture-{}", self.0)
    }
}

/// Tracks captures in progress. Clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    active_count: Arc<AtomicU64>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new capture. Returns a guard that decrements on drop.
    pub fn track(&self) -> InFlightGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        let id = CaptureId::new();
        tracing::trace!(capture_id = %id, "Capture started");
        InFlightGuard {
            id,
            active_count: Arc::clone(&self.active_count),
        }
    }

    /// Number of captures currently in progress.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }
}

/// Held for the duration of one capture.
#[derive(Debug)]
pub struct InFlightGuard {
    id: CaptureId,
    active_count: Arc<AtomicU64>,
}

impl InFlightGuard {
    pub fn id(&self) -> CaptureId {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(capture_id = %self.id, "Capture finished");
    }
}
