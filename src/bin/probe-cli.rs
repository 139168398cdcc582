//! One-shot connectivity diagnostic.
//!
//! Deliberately flag-free: it reads the same configuration and environment
//! as the main binary, so what it tests is exactly what the service will
//! use. Runs both resolution strategies independently, makes one gating
//! connection attempt, prints the report, and exits 0 only on success.

use std::process::ExitCode;

use gatekeeper::config;
use gatekeeper::observability::logging;
use gatekeeper::probe::diagnostics;
use gatekeeper::probe::{ProbeEndpoint, TcpSessionFactory};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.observability);

    let endpoint = match ProbeEndpoint::from_config(&config.probe) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("invalid connection URI: {e}");
            return ExitCode::FAILURE;
        }
    };

    let factory = TcpSessionFactory::new(endpoint.budgets);
    let (report, outcome) = diagnostics::run_report(&endpoint, &factory).await;
    println!("{report}");

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
