//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! env (GATEKEEPER_CONFIG → TOML file, else defaults)
//!     → loader.rs (parse & deserialize, then env overrides)
//!     → validation.rs (semantic checks)
//!     → GatekeeperConfig (validated, immutable)
//!     → handed to the gates and the probe at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets (the connection URI) come from the environment, not the file,
//!   whenever both are present

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{AccessConfig, GatekeeperConfig, ObservabilityConfig, ProbeConfig};
