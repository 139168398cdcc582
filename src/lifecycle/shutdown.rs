//! Shutdown coordination for the gatekeeper.

use tokio_util::sync::CancellationToken;

/// Coordinator for graceful shutdown.
///
/// Owns the root cancellation token. Long-running work holds child tokens
/// and races them at every suspension point, so a trigger lands within one
/// poll rather than at the next retry boundary.
#[derive(Debug, Clone)]
pub struct Shutdown {
    root: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        Self { root: CancellationToken::new() }
    }

    /// Child token for one task. Tokens handed out after the trigger are
    /// born cancelled, so late subscribers cannot miss the signal.
    pub fn token(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Trigger shutdown. Idempotent.
    pub fn trigger(&self) {
        self.root.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
