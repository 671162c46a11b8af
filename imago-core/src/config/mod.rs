//! Configuration module
//!
//! Declarative configuration for providers and their model capabilities.
//! Loaded once at startup, validated, and frozen into the model catalog
//! and adapter registry.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use error::{ConfigError, ValidationError, ValidationErrorKind};
pub use schema::{ImagoConfig, ModelEntry, ProviderEntry, ProviderKind};
pub use secrets::SecretString;
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<ImagoConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    // Interpolate environment variables before parsing
    let interpolated = env::interpolate_env_vars(&content)?;

    let config: ImagoConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<ImagoConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    let interpolated = env::interpolate_env_vars(&content)?;

    let config: ImagoConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}
