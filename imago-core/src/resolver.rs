//! Parameter resolution
//!
//! Merges a caller-supplied partial request with a model's capability
//! descriptor: rejects unsupported fields, fills defaults, and validates
//! every present value against its constraint. Resolution is a pure
//! function of its inputs; identical inputs always produce an identical
//! [`ResolvedRequest`] or an identical failure, and it performs no I/O.

use crate::capabilities::{ModelCapability, ParameterSchema};
use crate::protocol::{ImageGenerationRequest, ResolvedRequest};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Failures raised during resolution, before any network call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The prompt was missing or blank
    #[error("prompt must be a non-empty string")]
    EmptyPrompt,

    /// The caller supplied a parameter the target model does not accept
    #[error("parameter '{name}' is not supported by model '{model_id}'")]
    UnsupportedParameter { name: String, model_id: String },

    /// A parameter name is not part of the standard schema at all
    #[error("'{name}' is not a recognized standard parameter")]
    UnknownParameter { name: String },

    /// A value failed its semantic-type or constraint check
    #[error("invalid value for '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: Value,
        reason: String,
    },
}

/// Resolve a caller request against a model capability.
///
/// Steps, in order:
/// 1. the prompt must be present and non-blank;
/// 2. every caller-supplied parameter must be in the model's supported
///    set; the first offending field fails the whole request (unknown
///    fields are never silently dropped);
/// 3. supported parameters the caller omitted receive the capability's
///    default, when one is defined;
/// 4. every present value (caller-supplied and defaulted alike) is checked
///    against its schema spec, with the capability's override narrowing
///    the base constraint;
/// 5. the fully resolved request is returned.
///
/// Parameters are visited in sorted name order so the reported failure is
/// deterministic.
pub fn resolve(
    schema: &ParameterSchema,
    request: &ImageGenerationRequest,
    capability: &ModelCapability,
) -> Result<ResolvedRequest, ResolveError> {
    if request.prompt.trim().is_empty() {
        return Err(ResolveError::EmptyPrompt);
    }

    // Reject unsupported caller parameters, first offender wins.
    let mut caller_names: Vec<&str> = request.parameters.keys().map(String::as_str).collect();
    caller_names.sort_unstable();
    for name in &caller_names {
        if !capability.supports(name) {
            return Err(ResolveError::UnsupportedParameter {
                name: (*name).to_string(),
                model_id: capability.model_id.clone(),
            });
        }
    }

    // Merge caller values with capability defaults.
    let mut parameters: HashMap<String, Value> = request.parameters.clone();
    for name in capability.sorted_parameters() {
        if !parameters.contains_key(name) {
            if let Some(default) = capability.defaults.get(name) {
                parameters.insert(name.to_string(), default.clone());
            }
        }
    }

    // Validate every present value, defaults included, so a misconfigured
    // catalog default fails loudly instead of reaching a provider.
    let mut merged_names: Vec<&str> = parameters.keys().map(String::as_str).collect();
    merged_names.sort_unstable();
    for name in merged_names {
        let value = &parameters[name];
        let spec = schema
            .describe(name)
            .ok_or_else(|| ResolveError::UnknownParameter {
                name: name.to_string(),
            })?;

        spec.semantic_type
            .check(value)
            .map_err(|reason| ResolveError::InvalidValue {
                name: name.to_string(),
                value: value.clone(),
                reason,
            })?;

        // The per-model override narrows (replaces) the base constraint.
        let constraint = capability.overrides.get(name).or(spec.constraint.as_ref());
        if let Some(constraint) = constraint {
            constraint
                .check(value)
                .map_err(|reason| ResolveError::InvalidValue {
                    name: name.to_string(),
                    value: value.clone(),
                    reason,
                })?;
        }
    }

    Ok(ResolvedRequest {
        model_id: request.model_id.clone(),
        provider_id: capability.provider_id.clone(),
        prompt: request.prompt.clone(),
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::Constraint;

    fn capability() -> ModelCapability {
        ModelCapability::new("cogview-4", "zhipu")
            .with_parameters(["size", "n", "quality"])
            .with_default("size", "1024x1024")
            .with_default("n", 1)
            .with_override(
                "size",
                Constraint::one_of(["768x768", "1024x1024", "1440x720"]),
            )
    }

    #[test]
    fn test_defaults_fill_omitted_parameters() {
        let schema = ParameterSchema::standard();
        let request = ImageGenerationRequest::new("cogview-4", "a cat");

        let resolved = resolve(&schema, &request, &capability()).unwrap();

        assert_eq!(resolved.param_str("size"), Some("1024x1024"));
        assert_eq!(resolved.param_u32("n"), Some(1));
        // No default for quality, so it stays absent.
        assert!(resolved.parameters.get("quality").is_none());
    }

    #[test]
    fn test_caller_value_wins_over_default() {
        let schema = ParameterSchema::standard();
        let request =
            ImageGenerationRequest::new("cogview-4", "a cat").with_parameter("size", "768x768");

        let resolved = resolve(&schema, &request, &capability()).unwrap();
        assert_eq!(resolved.param_str("size"), Some("768x768"));
    }

    #[test]
    fn test_override_narrows_base_constraint() {
        let schema = ParameterSchema::standard();
        // "512x512" satisfies the base WxH pattern but not the model's enum.
        let request =
            ImageGenerationRequest::new("cogview-4", "a cat").with_parameter("size", "512x512");

        let err = resolve(&schema, &request, &capability()).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidValue { ref name, .. } if name == "size"));
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let schema = ParameterSchema::standard();
        let request = ImageGenerationRequest::new("cogview-4", "   ");
        assert_eq!(
            resolve(&schema, &request, &capability()),
            Err(ResolveError::EmptyPrompt)
        );
    }

    #[test]
    fn test_unsupported_parameter_names_offending_field() {
        let schema = ParameterSchema::standard();
        let request =
            ImageGenerationRequest::new("cogview-4", "a cat").with_parameter("steps", 30);

        let err = resolve(&schema, &request, &capability()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnsupportedParameter {
                name: "steps".to_string(),
                model_id: "cogview-4".to_string(),
            }
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let schema = ParameterSchema::standard();
        let request = ImageGenerationRequest::new("cogview-4", "a cat")
            .with_parameter("quality", "hd")
            .with_parameter("n", 2);

        let a = resolve(&schema, &request, &capability()).unwrap();
        let b = resolve(&schema, &request, &capability()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolved_parameters_stay_within_supported_set() {
        let schema = ParameterSchema::standard();
        let request = ImageGenerationRequest::new("cogview-4", "a cat")
            .with_parameter("n", 2)
            .with_parameter("quality", "standard");

        let resolved = resolve(&schema, &request, &capability()).unwrap();
        let cap = capability();
        for name in resolved.parameters.keys() {
            assert!(cap.supports(name), "'{}' leaked through resolution", name);
        }
    }

    #[test]
    fn test_fractional_count_rejected() {
        let schema = ParameterSchema::standard();
        // A fractional n would survive resolution as a plain number but
        // fall out of the integer-typed wire field, silently vanishing.
        let request =
            ImageGenerationRequest::new("cogview-4", "a cat").with_parameter("n", 2.5);

        let err = resolve(&schema, &request, &capability()).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidValue { ref name, .. } if name == "n"));
    }

    #[test]
    fn test_misconfigured_default_fails_validation() {
        let schema = ParameterSchema::standard();
        let broken = ModelCapability::new("cogview-4", "zhipu")
            .with_parameters(["n"])
            .with_default("n", "two");

        let request = ImageGenerationRequest::new("cogview-4", "a cat");
        let err = resolve(&schema, &request, &broken).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidValue { ref name, .. } if name == "n"));
    }

    #[test]
    fn test_capability_parameter_outside_schema_is_rejected() {
        let schema = ParameterSchema::standard();
        let odd = ModelCapability::new("m", "p").with_parameters(["glitter"]);
        let request = ImageGenerationRequest::new("m", "a cat").with_parameter("glitter", 9);

        let err = resolve(&schema, &request, &odd).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnknownParameter {
                name: "glitter".to_string()
            }
        );
    }
}
