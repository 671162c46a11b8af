//! Environment variable interpolation for configuration

use super::error::ConfigError;
use regex::Regex;
use std::env;

/// Interpolate `${VAR}` references in a configuration string.
///
/// A reference to an unset variable is an error: silently leaving the
/// placeholder in place would send literal `${...}` strings as API keys.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let env_var_pattern = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = content.to_string();

    for cap in env_var_pattern.captures_iter(content) {
        let full_match = cap.get(0).map(|m| m.as_str()).unwrap_or_default();
        let var_name = &cap[1];

        match env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match, &value);
            }
            Err(_) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                });
            }
        }
    }

    Ok(result)
}
