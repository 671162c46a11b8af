//! Per-model capability descriptors
//!
//! A [`ModelCapability`] declares which standard parameters one model
//! accepts, its defaults, and any per-model narrowing of the base
//! constraints. Capabilities are supplied by the model catalog
//! (configuration) and are read-only at request time.

use super::constraints::Constraint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Capability descriptor for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCapability {
    /// Model identifier (e.g., "cogview-4")
    pub model_id: String,

    /// Provider that serves this model
    pub provider_id: String,

    /// Standard parameter names this model accepts
    #[serde(default)]
    pub supported_parameters: HashSet<String>,

    /// Default values injected when the caller omits a parameter
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub defaults: HashMap<String, Value>,

    /// Per-model constraint narrowing, keyed by parameter name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub overrides: HashMap<String, Constraint>,
}

impl ModelCapability {
    /// Create a capability with no supported parameters
    pub fn new(model_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            provider_id: provider_id.into(),
            supported_parameters: HashSet::new(),
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// Declare the supported parameter names
    pub fn with_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_parameters
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Attach a default value for a supported parameter
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Narrow the base constraint of a supported parameter
    pub fn with_override(mut self, name: impl Into<String>, constraint: Constraint) -> Self {
        self.overrides.insert(name.into(), constraint);
        self
    }

    /// Whether this model accepts the given parameter
    pub fn supports(&self, name: &str) -> bool {
        self.supported_parameters.contains(name)
    }

    /// Supported parameter names, sorted for deterministic iteration
    pub fn sorted_parameters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .supported_parameters
            .iter()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

/// Read-only lookup of model capabilities, keyed by model id.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: HashMap<String, ModelCapability>,
}

impl ModelCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability, keyed by its model id
    pub fn insert(&mut self, capability: ModelCapability) {
        self.models.insert(capability.model_id.clone(), capability);
    }

    /// Look up the capability for a model
    pub fn get(&self, model_id: &str) -> Option<&ModelCapability> {
        self.models.get(model_id)
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog has no models
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl FromIterator<ModelCapability> for ModelCatalog {
    fn from_iter<T: IntoIterator<Item = ModelCapability>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for capability in iter {
            catalog.insert(capability);
        }
        catalog
    }
}
