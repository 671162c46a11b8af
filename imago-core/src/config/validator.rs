//! Configuration validation utilities

use super::error::{ValidationError, ValidationErrorKind};
use super::schema::ImagoConfig;
use crate::capabilities::ParameterSchema;
use std::collections::HashSet;
use url::Url;

/// Supported configuration schema version
const SUPPORTED_VERSION: &str = "1";

/// Configuration validator with extended rules beyond serde's shape checks.
pub struct ConfigValidator {
    schema: ParameterSchema,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    /// Create a validator checking against the standard parameter schema
    pub fn new() -> Self {
        Self {
            schema: ParameterSchema::standard(),
        }
    }

    /// Create a validator checking against a custom schema
    pub fn with_schema(schema: ParameterSchema) -> Self {
        Self { schema }
    }

    /// Validate a configuration.
    pub fn validate(&self, config: &ImagoConfig) -> Result<(), ValidationError> {
        if config.version != SUPPORTED_VERSION {
            return Err(ValidationError::new(
                "version",
                ValidationErrorKind::InvalidValue {
                    expected: SUPPORTED_VERSION.to_string(),
                    actual: config.version.clone(),
                },
            ));
        }

        self.validate_providers(config)?;
        self.validate_models(config)?;
        Ok(())
    }

    fn validate_providers(&self, config: &ImagoConfig) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();

        for (idx, provider) in config.providers.iter().enumerate() {
            let path = format!("providers[{}]", idx);

            if provider.id.is_empty() {
                return Err(ValidationError::new(
                    format!("{}.id", path),
                    ValidationErrorKind::RequiredFieldMissing,
                ));
            }
            if !seen.insert(provider.id.clone()) {
                return Err(ValidationError::new(
                    format!("{}.id", path),
                    ValidationErrorKind::DuplicateValue {
                        value: provider.id.clone(),
                    },
                ));
            }
            if provider.api_key.is_empty() {
                return Err(ValidationError::new(
                    format!("{}.api_key", path),
                    ValidationErrorKind::RequiredFieldMissing,
                ));
            }

            Url::parse(&provider.base_url).map_err(|e| {
                ValidationError::new(
                    format!("{}.base_url", path),
                    ValidationErrorKind::InvalidUrl {
                        message: e.to_string(),
                    },
                )
                .with_context(provider.base_url.clone())
            })?;
        }

        Ok(())
    }

    fn validate_models(&self, config: &ImagoConfig) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();

        for (p_idx, provider) in config.providers.iter().enumerate() {
            for (m_idx, model) in provider.models.iter().enumerate() {
                let path = format!("providers[{}].models[{}]", p_idx, m_idx);

                // Model ids must be globally unique: the catalog is keyed
                // by model id alone.
                if !seen.insert(model.id.clone()) {
                    return Err(ValidationError::new(
                        format!("{}.id", path),
                        ValidationErrorKind::DuplicateValue {
                            value: model.id.clone(),
                        },
                    ));
                }

                let supported: HashSet<&str> = model
                    .supported_parameters
                    .iter()
                    .map(String::as_str)
                    .collect();

                for name in &model.supported_parameters {
                    if !self.schema.contains(name) {
                        return Err(ValidationError::new(
                            format!("{}.supported_parameters", path),
                            ValidationErrorKind::UnknownParameter { name: name.clone() },
                        ));
                    }
                }

                for name in model.defaults.keys() {
                    if !supported.contains(name.as_str()) {
                        return Err(ValidationError::new(
                            format!("{}.defaults.{}", path, name),
                            ValidationErrorKind::Custom {
                                message: format!(
                                    "default for '{}' which is not in supported_parameters",
                                    name
                                ),
                            },
                        ));
                    }
                }

                for name in model.overrides.keys() {
                    if !supported.contains(name.as_str()) {
                        return Err(ValidationError::new(
                            format!("{}.overrides.{}", path, name),
                            ValidationErrorKind::Custom {
                                message: format!(
                                    "override for '{}' which is not in supported_parameters",
                                    name
                                ),
                            },
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
