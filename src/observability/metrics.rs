//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define probe metrics (attempts, outcomes, reachability)
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gatekeeper_probe_attempts_total` (counter): probe attempts started
//! - `gatekeeper_probe_outcomes_total` (counter): attempts by result class
//! - `gatekeeper_endpoint_reachable` (gauge): 1 after a successful attempt,
//!   0 after a failed one
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - The `result` label carries either `success` or the failure class
//! - Recording before `init_metrics` (or without it) is a no-op

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::probe::ProbeOutcome;

/// Install the Prometheus exporter and its scrape listener.
pub fn init_metrics(address: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(address).install() {
        Ok(()) => tracing::info!(address = %address, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

pub fn record_probe_attempt() {
    metrics::counter!("gatekeeper_probe_attempts_total").increment(1);
}

pub fn record_probe_outcome(outcome: &ProbeOutcome) {
    match outcome {
        ProbeOutcome::Success(_) => {
            metrics::counter!("gatekeeper_probe_outcomes_total", "result" => "success")
                .increment(1);
            metrics::gauge!("gatekeeper_endpoint_reachable").set(1.0);
        }
        ProbeOutcome::Failure(failure) => {
            metrics::counter!("gatekeeper_probe_outcomes_total", "result" => failure.class_str())
                .increment(1);
            metrics::gauge!("gatekeeper_endpoint_reachable").set(0.0);
        }
    }
}
