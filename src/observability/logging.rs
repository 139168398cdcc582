//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem exactly once at process start
//! - Configure the log level from config and environment
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - `RUST_LOG` wins when set; otherwise the configured level applies to
//!   this crate and warn elsewhere

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Install the global tracing subscriber. Call once from a binary's main;
/// the global registry rejects a second install with a panic.
pub fn init(config: &ObservabilityConfig) {
    let default_directives = format!("warn,gatekeeper={}", config.log_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
