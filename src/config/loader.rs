//! Configuration loading.
//!
//! Layers, lowest precedence first: defaults, TOML file, environment
//! variables, command-line overrides.

use std::fs;
use std::path::Path;

use crate::config::schema::{Environment, ServiceConfig, StoreBackend};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store: Option<StoreBackend>,
    pub port: Option<u16>,
}

impl Overrides {
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(store) = self.store {
            config.store.backend = store;
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
    }
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment variables using `lookup` to read them.
///
/// Recognised: `ENV`, `PORT`, `MONGODB_URI`, `TODO_STORE`, `LOG_LEVEL`.
/// Unset and empty variables leave the config untouched.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(env) = get("ENV") {
        config.environment = Environment::from_env_value(&env);
    }

    if let Some(port) = get("PORT") {
        config.listener.port = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
            var: "PORT",
            message: format!("'{}': {}", port, e),
        })?;
    }

    if let Some(uri) = get("MONGODB_URI") {
        config.store.mongodb_uri = Some(uri);
    }

    if let Some(backend) = get("TODO_STORE") {
        config.store.backend = backend
            .parse()
            .map_err(|message| ConfigError::Env { var: "TODO_STORE", message })?;
    }

    if let Some(level) = get("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

/// Load, layer and validate configuration from the process environment.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<ServiceConfig, ConfigError> {
    load_config_with(path, overrides, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(
    path: Option<&Path>,
    overrides: &Overrides,
    lookup: F,
) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ServiceConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
