//! Startup gate for the building-management backend.
//!
//! The process does exactly one thing before declaring itself ready: prove
//! the configured datastore endpoint is reachable. Configuration is loaded
//! from file and environment, then the probe retries on a fixed delay until
//! the endpoint answers, shutdown is requested, or a failure that cannot
//! self-resolve exhausts its attempt cap.
//!
//! ```text
//! config (file + env)
//!     → ProbeEndpoint (parsed once)
//!     → probe_until_success (races the shutdown token)
//!     → exit 0 only after the endpoint is confirmed reachable
//! ```

use gatekeeper::config;
use gatekeeper::lifecycle::{signals, Shutdown};
use gatekeeper::observability::{logging, metrics};
use gatekeeper::probe::{self, ProbeEndpoint, ProbeError, RetryPolicy, TcpSessionFactory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;
    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gatekeeper starting");

    let endpoint = ProbeEndpoint::from_config(&config.probe)?;

    tracing::info!(
        endpoint = %endpoint,
        strategy = %endpoint.strategy,
        connect_timeout_ms = config.probe.connect_timeout_ms,
        socket_timeout_ms = config.probe.socket_timeout_ms,
        server_selection_timeout_ms = config.probe.server_selection_timeout_ms,
        retry_delay_secs = config.probe.retry_delay_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    let factory = TcpSessionFactory::new(endpoint.budgets);
    let policy = RetryPolicy::from_config(&config.probe);
    let token = shutdown.token();

    match probe::probe_until_success(&endpoint, &factory, policy, &token).await {
        Ok(success) => {
            tracing::info!(
                member = %success.member,
                members_reachable = success.resources.len(),
                elapsed_ms = success.elapsed.as_millis() as u64,
                "endpoint confirmed reachable, ready to serve"
            );
            Ok(())
        }
        Err(ProbeError::Cancelled) => {
            tracing::warn!("shutdown requested before the endpoint was confirmed reachable");
            Err(ProbeError::Cancelled.into())
        }
        Err(err) => {
            tracing::error!(error = %err, "endpoint unreachable");
            Err(err.into())
        }
    }
}
