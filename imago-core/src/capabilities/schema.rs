//! The standard parameter schema
//!
//! The canonical vocabulary of request fields every caller speaks,
//! independent of which provider ultimately serves the request. The schema
//! is pure data: each entry names a parameter, its semantic type, and an
//! optional base constraint. It is built once at startup and read-only
//! thereafter.
//!
//! Backward compatibility invariant: registering a new parameter is
//! additive and never changes how existing requests resolve.

use super::constraints::Constraint;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Compiled once; the pattern is a literal so compilation cannot fail.
fn aspect_ratio_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[1-9]\d*:[1-9]\d*$").unwrap())
}

/// Semantic type of a standard parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticType {
    /// Free-form string
    String,
    /// Numeric value (integer or float)
    Number,
    /// Whole-number value (counts, pixel dimensions, seeds)
    Integer,
    /// String drawn from a closed enumeration
    EnumOfString,
    /// Aspect-ratio string of the form "W:H" (e.g. "16:9")
    AspectRatio,
}

impl SemanticType {
    /// Check that a value has the right JSON shape for this type.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            SemanticType::String | SemanticType::EnumOfString => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err("expected a string".to_string())
                }
            }
            SemanticType::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err("expected a number".to_string())
                }
            }
            SemanticType::Integer => {
                // A fractional value here would later be dropped during
                // adapter conversion, so reject it up front.
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err("expected an integer".to_string())
                }
            }
            SemanticType::AspectRatio => {
                let text = value
                    .as_str()
                    .ok_or_else(|| "expected an aspect-ratio string".to_string())?;
                if aspect_ratio_pattern().is_match(text) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not a valid aspect ratio (expected W:H)", text))
                }
            }
        }
    }
}

/// Specification of one recognized standard parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Canonical parameter name
    pub name: String,

    /// Semantic type of the value
    pub semantic_type: SemanticType,

    /// Base constraint, narrowable per model via capability overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,

    /// Whether callers must always supply this parameter
    #[serde(default)]
    pub required: bool,
}

impl ParameterSpec {
    /// Create an optional parameter spec without a constraint
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            constraint: None,
            required: false,
        }
    }

    /// Attach a base constraint
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Mark the parameter as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Read-only lookup table of standard parameter specifications.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
    specs: HashMap<String, ParameterSpec>,
}

impl ParameterSchema {
    /// Create an empty schema (used by tests that build isolated schemas)
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in standard vocabulary.
    pub fn standard() -> Self {
        let mut schema = Self::new();

        schema.register(
            ParameterSpec::new("prompt", SemanticType::String).required(),
        );
        schema.register(ParameterSpec::new("negative_prompt", SemanticType::String));
        schema.register(
            ParameterSpec::new("size", SemanticType::String).with_constraint(Constraint::Pattern {
                pattern: r"^\d+x\d+$".to_string(),
            }),
        );
        schema.register(ParameterSpec::new("aspect_ratio", SemanticType::AspectRatio));
        schema.register(
            ParameterSpec::new("width", SemanticType::Integer)
                .with_constraint(Constraint::range(16.0, 4096.0)),
        );
        schema.register(
            ParameterSpec::new("height", SemanticType::Integer)
                .with_constraint(Constraint::range(16.0, 4096.0)),
        );
        schema.register(
            ParameterSpec::new("seed", SemanticType::Integer)
                .with_constraint(Constraint::range(0.0, None)),
        );
        schema.register(
            ParameterSpec::new("steps", SemanticType::Integer)
                .with_constraint(Constraint::range(1.0, 150.0)),
        );
        schema.register(
            ParameterSpec::new("cfg", SemanticType::Number)
                .with_constraint(Constraint::range(0.0, 35.0)),
        );
        schema.register(
            ParameterSpec::new("n", SemanticType::Integer)
                .with_constraint(Constraint::range(1.0, 10.0)),
        );
        schema.register(
            ParameterSpec::new("quality", SemanticType::EnumOfString)
                .with_constraint(Constraint::one_of(["standard", "hd"])),
        );
        schema.register(
            ParameterSpec::new("style", SemanticType::EnumOfString)
                .with_constraint(Constraint::one_of(["vivid", "natural"])),
        );
        schema.register(
            ParameterSpec::new("response_format", SemanticType::EnumOfString)
                .with_constraint(Constraint::one_of(["url", "b64_json"])),
        );

        schema
    }

    /// Register a parameter spec, keyed by its name. Additive only.
    pub fn register(&mut self, spec: ParameterSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }

    /// Look up the specification for a parameter name.
    pub fn describe(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.get(name)
    }

    /// Whether a parameter name is part of the schema.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// All registered parameter names, sorted for deterministic iteration.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_schema_describes_core_parameters() {
        let schema = ParameterSchema::standard();
        for name in ["prompt", "size", "aspect_ratio", "seed", "steps", "cfg", "n"] {
            assert!(schema.describe(name).is_some(), "missing '{}'", name);
        }
        assert!(schema.describe("prompt").unwrap().required);
        assert!(!schema.describe("seed").unwrap().required);
        assert!(schema.describe("nonexistent").is_none());
    }

    #[test]
    fn test_aspect_ratio_semantic_type() {
        let t = SemanticType::AspectRatio;
        assert!(t.check(&json!("16:9")).is_ok());
        assert!(t.check(&json!("1:1")).is_ok());
        assert!(t.check(&json!("0:9")).is_err());
        assert!(t.check(&json!("wide")).is_err());
        assert!(t.check(&json!(16)).is_err());
    }

    #[test]
    fn test_integer_semantic_type() {
        let t = SemanticType::Integer;
        assert!(t.check(&json!(2)).is_ok());
        assert!(t.check(&json!(0)).is_ok());
        assert!(t.check(&json!(2.5)).is_err());
        assert!(t.check(&json!("2")).is_err());
    }

    #[test]
    fn test_registration_is_additive() {
        let mut schema = ParameterSchema::standard();
        let before = schema.parameter_names().len();

        schema.register(ParameterSpec::new("watermark", SemanticType::String));

        assert_eq!(schema.parameter_names().len(), before + 1);
        // Existing entries are untouched.
        assert_eq!(
            schema.describe("quality").unwrap().constraint,
            Some(Constraint::one_of(["standard", "hd"]))
        );
    }
}
