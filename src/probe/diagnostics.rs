//! Operator-facing diagnostics.
//!
//! Two consumers: the retry loop logs the guidance for a failure class the
//! first time it sees it, and the one-shot CLI prints a full report that
//! runs both resolution strategies independently before the gating attempt.
//! Each failure class maps to its own numbered checklist.

use std::fmt;

use tokio::net::lookup_host;

use crate::probe::endpoint::ProbeEndpoint;
use crate::probe::outcome::{ProbeFailure, ProbeOutcome};
use crate::probe::resolve;
use crate::probe::runner;
use crate::probe::session::SessionFactory;

const DNS_STEPS: &[&str] = &[
    "Check basic network connectivity: can this host reach anything outside its own network?",
    "Verify the hostname in the connection string is spelled exactly as issued.",
    "Try an alternate network path (different network, VPN on or off); some resolvers drop SRV queries.",
    "If the cluster was created or renamed recently, wait for DNS propagation to finish.",
];

const TIMEOUT_STEPS: &[&str] = &[
    "Check network connectivity between this host and the cluster.",
    "Verify this host's public IP is on the cluster's IP allow-list; a missing entry shows up as a timeout, not a rejection.",
    "Confirm the service is up and listening on the configured ports.",
    "Try an alternate network path; office firewalls commonly block datastore ports.",
    "If the network is known to be slow, raise the timeout budgets.",
];

const AUTH_STEPS: &[&str] = &[
    "Verify the username and password in the connection string.",
    "Check the authSource option points at the database where the user is defined.",
    "Verify this host's public IP is on the cluster's IP allow-list.",
    "Confirm the credential has not expired or been rotated since deployment.",
];

const GENERIC_STEPS: &[&str] = &[
    "Check network connectivity between this host and the cluster.",
    "Confirm the service is running and reachable on the configured ports.",
    "Verify the connection string (hosts, ports, options) is current.",
    "Try an alternate network path to rule out local filtering.",
];

/// Numbered troubleshooting steps for a failure class.
pub fn troubleshooting(failure: &ProbeFailure) -> &'static [&'static str] {
    match failure {
        ProbeFailure::DnsResolution { .. } => DNS_STEPS,
        ProbeFailure::Timeout { .. } => TIMEOUT_STEPS,
        ProbeFailure::AuthRejected { .. } => AUTH_STEPS,
        ProbeFailure::Unclassified { .. } => GENERIC_STEPS,
    }
}

/// Accumulated output of a one-shot diagnostic run.
#[derive(Debug, Default)]
pub struct DiagnosticReport {
    lines: Vec<String>,
}

impl DiagnosticReport {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Run the full diagnostic: both resolution strategies independently, then
/// one gating connection attempt with guidance attached on failure.
pub async fn run_report(
    endpoint: &ProbeEndpoint,
    factory: &dyn SessionFactory,
) -> (DiagnosticReport, ProbeOutcome) {
    let mut report = DiagnosticReport::default();
    report.push(format!("Endpoint: {endpoint}"));
    report.push(format!("Configured strategy: {}", endpoint.strategy));
    report.push(String::new());

    report.push("SRV discovery:".to_string());
    for line in srv_sweep(endpoint).await {
        report.push(format!("  {line}"));
    }
    report.push(String::new());

    report.push("Direct resolution:".to_string());
    for line in direct_sweep(endpoint).await {
        report.push(format!("  {line}"));
    }
    report.push(String::new());

    let outcome = runner::probe(endpoint, factory).await;
    match &outcome {
        ProbeOutcome::Success(success) => {
            report.push(format!(
                "Connection: established via {} in {}ms",
                success.member,
                success.elapsed.as_millis()
            ));
            report.push("Reachable members:".to_string());
            for resource in &success.resources {
                report.push(format!("  - {resource}"));
            }
        }
        ProbeOutcome::Failure(failure) => {
            report.push(format!("Connection failed [{}]: {failure}", failure.class_str()));
            report.push("Troubleshooting:".to_string());
            for (i, step) in troubleshooting(failure).iter().enumerate() {
                report.push(format!("  {}. {step}", i + 1));
            }
        }
    }

    (report, outcome)
}

/// Query SRV for the endpoint's host regardless of the configured strategy,
/// so the report shows both paths.
async fn srv_sweep(endpoint: &ProbeEndpoint) -> Vec<String> {
    if !endpoint.srv_applicable() {
        return vec!["skipped (needs a single, named host)".to_string()];
    }

    let query = endpoint.srv_query_name();
    match resolve::resolver().srv_lookup(query.clone()).await {
        Ok(records) => {
            let mut lines = Vec::new();
            for record in records.iter() {
                let target = record.target().to_utf8();
                lines.push(format!("{query} -> {}:{}", target.trim_end_matches('.'), record.port()));
            }
            if lines.is_empty() {
                lines.push(format!("{query}: no records"));
            }
            lines
        }
        Err(e) => vec![format!("{query}: lookup failed ({e})")],
    }
}

async fn direct_sweep(endpoint: &ProbeEndpoint) -> Vec<String> {
    let mut lines = Vec::new();
    for member in &endpoint.hosts {
        if member.is_pre_resolved() {
            lines.push(format!("{member}: IP literal, no lookup needed"));
            continue;
        }
        match lookup_host((member.host.as_str(), member.port)).await {
            Ok(addrs) => {
                let ips: Vec<String> = addrs.map(|addr| addr.ip().to_string()).collect();
                if ips.is_empty() {
                    lines.push(format!("{member}: resolved to no addresses"));
                } else {
                    lines.push(format!("{member}: {}", ips.join(", ")));
                }
            }
            Err(e) => lines.push(format!("{member}: lookup failed ({e})")),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::outcome::TimeoutPhase;

    fn joined(steps: &[&str]) -> String {
        steps.join(" ").to_ascii_lowercase()
    }

    #[test]
    fn every_class_has_guidance() {
        let failures = [
            ProbeFailure::DnsResolution { host: "db".into(), detail: "nx".into() },
            ProbeFailure::timeout(TimeoutPhase::Connect, std::time::Duration::from_secs(10)),
            ProbeFailure::AuthRejected { detail: "bad credentials".into() },
            ProbeFailure::Unclassified { detail: "reset".into() },
        ];
        for failure in &failures {
            assert!(!troubleshooting(failure).is_empty());
        }
    }

    #[test]
    fn guidance_covers_the_operational_categories() {
        // Timeouts: connectivity, allow-list, availability, alternate path.
        let timeout = joined(TIMEOUT_STEPS);
        assert!(timeout.contains("network connectivity"));
        assert!(timeout.contains("allow-list"));
        assert!(timeout.contains("listening") || timeout.contains("running"));
        assert!(timeout.contains("alternate network path"));

        // Rejections: credentials and allow-list.
        let auth = joined(AUTH_STEPS);
        assert!(auth.contains("password"));
        assert!(auth.contains("allow-list"));
        assert!(auth.contains("authsource"));

        // DNS: connectivity, spelling, alternate path.
        let dns = joined(DNS_STEPS);
        assert!(dns.contains("network"));
        assert!(dns.contains("hostname"));
        assert!(dns.contains("alternate network path"));

        // Unclassified: the generic sweep.
        let generic = joined(GENERIC_STEPS);
        assert!(generic.contains("network connectivity"));
        assert!(generic.contains("connection string"));
    }

    #[test]
    fn guidance_differs_between_classes() {
        let timeout = ProbeFailure::timeout(TimeoutPhase::Connect, std::time::Duration::from_secs(1));
        let auth = ProbeFailure::AuthRejected { detail: "no".into() };
        assert_ne!(troubleshooting(&timeout), troubleshooting(&auth));
    }
}
