//! Server lifecycle states.

use tokio::sync::watch;

/// `Starting → Listening → ShuttingDown → Stopped`. No state is left once
/// `Stopped` is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Listening,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    /// Whether `next` may follow `self`.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Starting, Listening)
                | (Starting, Stopped)
                | (Listening, ShuttingDown)
                | (Listening, Stopped)
                | (ShuttingDown, Stopped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Listening => "listening",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state, observable through watch receivers.
#[derive(Debug)]
pub struct StateCell {
    tx: watch::Sender<LifecycleState>,
}

impl StateCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Starting);
        Self { tx }
    }

    pub fn get(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Move to `next`. Invalid transitions are ignored and logged.
    pub fn transition(&self, next: LifecycleState) -> bool {
        let current = self.get();
        if !current.can_transition_to(next) {
            tracing::warn!(from = %current, to = %next, "Ignoring invalid lifecycle transition");
            return false;
        }
        self.tx.send_replace(next);
        tracing::debug!(from = %current, to = %next, "Lifecycle transition");
        true
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}
