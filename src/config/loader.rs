//! Configuration loading from disk and environment.
//!
//! Resolution order at process start: a TOML file named by
//! `GATEKEEPER_CONFIG` (defaults apply when unset), then environment
//! overrides for the secrets that never belong in a file, then validation.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::GatekeeperConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV_VAR: &str = "GATEKEEPER_CONFIG";

/// Environment variable carrying the datastore connection URI.
pub const DB_URI_ENV_VAR: &str = "GATEKEEPER_DB_URI";

/// Fallback connection-URI variable, matching what deploy tooling exports.
pub const DB_URI_FALLBACK_ENV_VAR: &str = "MONGODB_URI";

/// Environment variable overriding the configured log level.
pub const LOG_LEVEL_ENV_VAR: &str = "GATEKEEPER_LOG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatekeeperConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GatekeeperConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve configuration for process start.
///
/// Environment overrides are applied before validation so a URI injected by
/// deploy tooling is checked the same way a file-provided one is.
pub fn load_from_env() -> Result<GatekeeperConfig, ConfigError> {
    let mut config = match env::var(CONFIG_PATH_ENV_VAR) {
        Ok(path) => {
            let content = fs::read_to_string(Path::new(&path)).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        Err(_) => GatekeeperConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides(config: &mut GatekeeperConfig) {
    if let Ok(uri) = env::var(DB_URI_ENV_VAR).or_else(|_| env::var(DB_URI_FALLBACK_ENV_VAR)) {
        config.probe.uri = uri;
    }

    if let Ok(level) = env::var(LOG_LEVEL_ENV_VAR) {
        config.observability.log_level = level;
    }
}
