//! Probe execution.
//!
//! # Data Flow
//! ```text
//! single attempt (probe):
//!     resolve.rs (DNS, own clock)
//!         → factory.connect (connect + server-selection budgets)
//!         → session.inventory (socket budget)
//!         → session.close
//!         → ProbeOutcome
//!
//! until success (probe_until_success):
//!     loop {
//!         attempt → Success? return
//!                 → Failure? guidance, fixed delay, go again
//!     }
//!     cancellation is raced at the attempt and at the delay
//! ```
//!
//! # Design Decisions
//! - An explicit loop, never recursion; waiting is a timed suspension of
//!   this task, not a blocked thread
//! - Failures that cannot self-resolve are capped; transient ones retry
//!   for as long as the token allows
//! - The attempt owns its session and has released it by the time an
//!   outcome is returned

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::ProbeConfig;
use crate::observability::metrics;
use crate::probe::diagnostics;
use crate::probe::endpoint::ProbeEndpoint;
use crate::probe::outcome::{ProbeError, ProbeOutcome, ProbeSuccess};
use crate::probe::resolve;
use crate::probe::session::SessionFactory;

/// Retry behavior for the until-success loop.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Fixed delay between attempts.
    pub delay: Duration,
    /// Attempts allowed for failures that cannot self-resolve.
    pub permanent_failure_limit: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            delay: Duration::from_secs(config.retry_delay_secs),
            permanent_failure_limit: config.permanent_failure_limit,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

/// One probe attempt: resolve, establish, enumerate, release.
pub async fn probe(endpoint: &ProbeEndpoint, factory: &dyn SessionFactory) -> ProbeOutcome {
    metrics::record_probe_attempt();

    let outcome = run_attempt(endpoint, factory).await;

    match &outcome {
        ProbeOutcome::Success(success) => {
            tracing::info!(
                member = %success.member,
                resources = success.resources.len(),
                elapsed_ms = success.elapsed.as_millis() as u64,
                "endpoint reachable"
            );
        }
        ProbeOutcome::Failure(failure) => {
            tracing::warn!(class = failure.class_str(), error = %failure, "probe attempt failed");
        }
    }

    metrics::record_probe_outcome(&outcome);
    outcome
}

async fn run_attempt(endpoint: &ProbeEndpoint, factory: &dyn SessionFactory) -> ProbeOutcome {
    let started = Instant::now();

    tracing::debug!(endpoint = %endpoint, strategy = %endpoint.strategy, "resolving service location");
    let target = match resolve::resolve(endpoint).await {
        Ok(target) => target,
        Err(failure) => return ProbeOutcome::Failure(failure),
    };

    tracing::debug!(members = target.members.len(), "establishing gating session");
    let mut session = match factory.connect(&target).await {
        Ok(session) => session,
        Err(failure) => return ProbeOutcome::Failure(failure),
    };

    let inventory = session.inventory().await;
    session.close().await;

    match inventory {
        Ok(resources) => ProbeOutcome::Success(ProbeSuccess {
            member: session.member().to_string(),
            resources,
            elapsed: started.elapsed(),
        }),
        Err(failure) => ProbeOutcome::Failure(failure),
    }
}

/// Run [`probe`] until the endpoint is confirmed reachable, the token is
/// cancelled, or a non-transient failure exhausts its attempt cap.
///
/// The delay between attempts is fixed; there is no backoff. The operator
/// fixing a dead network gets a result within one delay of the fix, and the
/// cost of a spaced-out connection attempt is trivial.
pub async fn probe_until_success(
    endpoint: &ProbeEndpoint,
    factory: &dyn SessionFactory,
    policy: RetryPolicy,
    cancel: &CancellationToken,
) -> Result<ProbeSuccess, ProbeError> {
    let mut attempts: u32 = 0;
    let mut permanent_failures: u32 = 0;
    let mut guided_class: Option<&'static str> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(ProbeError::Cancelled);
        }
        attempts += 1;

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            outcome = probe(endpoint, factory) => outcome,
        };

        let failure = match outcome {
            ProbeOutcome::Success(success) => return Ok(success),
            ProbeOutcome::Failure(failure) => failure,
        };

        if !failure.is_retry_eligible() {
            permanent_failures += 1;
            if permanent_failures >= policy.permanent_failure_limit {
                tracing::error!(
                    attempts,
                    class = failure.class_str(),
                    "giving up: this failure cannot resolve itself"
                );
                return Err(ProbeError::GaveUp { attempts, last: failure });
            }
        }

        // Guidance once per failure class, not once per attempt.
        if guided_class != Some(failure.class_str()) {
            for (i, step) in diagnostics::troubleshooting(&failure).iter().enumerate() {
                tracing::info!(step = i + 1, "{}", step);
            }
            guided_class = Some(failure.class_str());
        }

        tracing::info!(
            attempt = attempts,
            delay_secs = policy.delay.as_secs(),
            "retrying after delay"
        );
        tokio::select! {
            _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
            _ = sleep(policy.delay) => {}
        }
    }
}
