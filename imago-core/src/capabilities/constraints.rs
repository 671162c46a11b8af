//! Declarative parameter constraints
//!
//! Constraints are plain data evaluated by one generic checker. The closed
//! set of constraint kinds (numeric range, allowed values, string pattern)
//! covers every standard parameter without a rule engine.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A declarative constraint on a parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Numeric bounds, inclusive on both ends
    Range {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },

    /// Closed enumeration of allowed string values
    OneOf { values: Vec<String> },

    /// String must match the given regular expression
    Pattern { pattern: String },
}

impl Constraint {
    /// Convenience constructor for an allowed-values constraint
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Convenience constructor for a numeric range constraint
    pub fn range(min: impl Into<Option<f64>>, max: impl Into<Option<f64>>) -> Self {
        Constraint::Range {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Check a value against this constraint.
    ///
    /// Returns a human-readable reason on violation.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::Range { min, max } => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| "expected a number".to_string())?;

                if let Some(min) = min {
                    if number < *min {
                        return Err(format!("value {} is below minimum {}", number, min));
                    }
                }
                if let Some(max) = max {
                    if number > *max {
                        return Err(format!("value {} exceeds maximum {}", number, max));
                    }
                }
                Ok(())
            }

            Constraint::OneOf { values } => {
                let text = value
                    .as_str()
                    .ok_or_else(|| "expected a string".to_string())?;

                if values.iter().any(|v| v == text) {
                    Ok(())
                } else {
                    Err(format!(
                        "'{}' is not one of the allowed values [{}]",
                        text,
                        values.join(", ")
                    ))
                }
            }

            Constraint::Pattern { pattern } => {
                let text = value
                    .as_str()
                    .ok_or_else(|| "expected a string".to_string())?;

                // Patterns may come from configuration, so compilation
                // failure is a violation rather than a panic.
                let regex = Regex::new(pattern)
                    .map_err(|e| format!("invalid constraint pattern '{}': {}", pattern, e))?;

                if regex.is_match(text) {
                    Ok(())
                } else {
                    Err(format!("'{}' does not match pattern '{}'", text, pattern))
                }
            }
        }
    }
}
