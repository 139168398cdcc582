//! Probe outcomes and failure classification.
//!
//! Everything that can go wrong during an attempt folds into a small
//! taxonomy. The classes drive two things downstream: whether the retry loop
//! keeps going (only failures that can self-resolve get unbounded retries)
//! and which troubleshooting steps get printed.

use std::time::Duration;

use thiserror::Error;

use crate::probe::endpoint::TimeoutBudgets;

/// Phase that exhausted its timeout budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    Connect,
    Socket,
    ServerSelection,
}

impl TimeoutPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeoutPhase::Connect => "connect",
            TimeoutPhase::Socket => "socket",
            TimeoutPhase::ServerSelection => "server selection",
        }
    }
}

impl std::fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified cause of a failed probe attempt.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    /// No host of the endpoint could be resolved to an address.
    #[error("DNS resolution failed for {host}: {detail}")]
    DnsResolution { host: String, detail: String },

    /// A timeout budget ran out before the phase completed.
    #[error("{phase} timeout after {budget_ms}ms")]
    Timeout { phase: TimeoutPhase, budget_ms: u64 },

    /// The endpoint was reached but rejected the session (credentials or
    /// address-based policy).
    #[error("endpoint rejected the session: {detail}")]
    AuthRejected { detail: String },

    /// Everything the other classes do not cover.
    #[error("probe failed: {detail}")]
    Unclassified { detail: String },
}

impl ProbeFailure {
    pub fn timeout(phase: TimeoutPhase, budget: Duration) -> Self {
        ProbeFailure::Timeout { phase, budget_ms: budget.as_millis() as u64 }
    }

    /// Whether waiting and retrying can plausibly fix this without operator
    /// intervention. Rejected credentials cannot un-reject themselves; a
    /// flaky network or a restarting cluster can.
    #[must_use]
    pub fn is_retry_eligible(&self) -> bool {
        !matches!(self, ProbeFailure::AuthRejected { .. })
    }

    /// Stable label for logs and metrics.
    pub fn class_str(&self) -> &'static str {
        match self {
            ProbeFailure::DnsResolution { .. } => "dns_resolution",
            ProbeFailure::Timeout { .. } => "timeout",
            ProbeFailure::AuthRejected { .. } => "auth_rejected",
            ProbeFailure::Unclassified { .. } => "unclassified",
        }
    }
}

/// Maps a socket-level error into the taxonomy. Session factories accept an
/// override so drivers whose errors carry more signal than raw I/O errors
/// can classify more precisely.
pub type ErrorClassifier = fn(&std::io::Error, &TimeoutBudgets) -> ProbeFailure;

/// Default classifier for plain TCP sessions.
pub fn classify_io_error(err: &std::io::Error, budgets: &TimeoutBudgets) -> ProbeFailure {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::TimedOut => ProbeFailure::timeout(TimeoutPhase::Connect, budgets.connect),
        ErrorKind::PermissionDenied => ProbeFailure::AuthRejected { detail: err.to_string() },
        _ => ProbeFailure::Unclassified { detail: err.to_string() },
    }
}

/// What a successful attempt observed.
#[derive(Debug, Clone)]
pub struct ProbeSuccess {
    /// Member that accepted the gating session.
    pub member: String,
    /// Reachable members enumerated as the confirmation artifact.
    pub resources: Vec<String>,
    /// Wall-clock duration of the attempt.
    pub elapsed: Duration,
}

/// Result of a single probe attempt.
#[derive(Debug)]
pub enum ProbeOutcome {
    Success(ProbeSuccess),
    Failure(ProbeFailure),
}

impl ProbeOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success(_))
    }
}

/// Terminal result of the until-success loop.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe cancelled before the endpoint was confirmed reachable")]
    Cancelled,

    #[error("gave up after {attempts} attempts: {last}")]
    GaveUp { attempts: u32, last: ProbeFailure },
}
