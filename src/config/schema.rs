//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gatekeeper. All types derive Serde traits for deserialization from config
//! files, and every struct carries `#[serde(default)]` so partial files work.

use serde::{Deserialize, Serialize};

/// Root configuration for the gatekeeper.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GatekeeperConfig {
    /// Route-gate policy (grants and redirect paths).
    pub access: AccessConfig,

    /// Connectivity-probe endpoint and timing.
    pub probe: ProbeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Route-gate policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Capability tokens granted to the worker role.
    pub worker_permissions: Vec<String>,

    /// Redirect target when no principal is present.
    pub login_path: String,

    /// Redirect target for authenticated principals on public-only pages.
    pub landing_path: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            worker_permissions: vec![
                "read:workorders".to_string(),
                "view:dashboard:worker".to_string(),
                "read:buildings".to_string(),
            ],
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

/// Connectivity-probe endpoint and timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Connection URI for the backing datastore. Credentials embedded here
    /// are held in memory but never logged.
    pub uri: String,

    /// Service name for SRV discovery (`_<service>._tcp.<host>`).
    pub service: String,

    /// Budget for establishing a connection to one member, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Budget for I/O on an established session, in milliseconds.
    pub socket_timeout_ms: u64,

    /// Budget for finding any usable member, in milliseconds.
    pub server_selection_timeout_ms: u64,

    /// Fixed delay between retry attempts, in seconds.
    pub retry_delay_secs: u64,

    /// Attempts allowed for failures that cannot self-resolve (rejected
    /// credentials and the like) before the retry loop gives up.
    pub permanent_failure_limit: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            service: "mongodb".to_string(),
            connect_timeout_ms: 10_000,
            socket_timeout_ms: 10_000,
            server_selection_timeout_ms: 5_000,
            retry_delay_secs: 5,
            permanent_failure_limit: 3,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
