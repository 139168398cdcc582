//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (the probe URI must parse as an endpoint)
//! - Validate value ranges (timeouts > 0, paths absolute)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatekeeperConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::GatekeeperConfig;
use crate::probe::endpoint::ProbeEndpoint;

/// A single validation failure, tied to the field that caused it.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatekeeperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (i, token) in config.access.worker_permissions.iter().enumerate() {
        if token.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("access.worker_permissions[{i}]"),
                "permission token must not be blank",
            ));
        }
    }
    if !config.access.login_path.starts_with('/') {
        errors.push(ValidationError::new("access.login_path", "must be an absolute path"));
    }
    if !config.access.landing_path.starts_with('/') {
        errors.push(ValidationError::new("access.landing_path", "must be an absolute path"));
    }

    if config.probe.service.is_empty() || config.probe.service.starts_with('_') {
        errors.push(ValidationError::new(
            "probe.service",
            "service name must be non-empty and bare (the _ and _tcp labels are added internally)",
        ));
    }
    for (field, value) in [
        ("probe.connect_timeout_ms", config.probe.connect_timeout_ms),
        ("probe.socket_timeout_ms", config.probe.socket_timeout_ms),
        ("probe.server_selection_timeout_ms", config.probe.server_selection_timeout_ms),
        ("probe.retry_delay_secs", config.probe.retry_delay_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }
    if config.probe.permanent_failure_limit == 0 {
        errors.push(ValidationError::new(
            "probe.permanent_failure_limit",
            "must allow at least one attempt",
        ));
    }
    if let Err(e) = ProbeEndpoint::from_config(&config.probe) {
        errors.push(ValidationError::new("probe.uri", e.to_string()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}' (expected one of {})", level, LOG_LEVELS.join(", ")),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a host:port socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
