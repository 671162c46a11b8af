//! Configuration schema structures with serde support

use crate::capabilities::Constraint;
use crate::config::secrets::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_true() -> bool {
    true
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImagoConfig {
    /// Schema version (required, no default)
    pub version: String,

    /// Image-generation providers
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,

    /// Custom metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// One provider's connection settings and served models
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderEntry {
    /// Unique provider identifier
    pub id: String,

    /// Which adapter family serves this provider
    pub kind: ProviderKind,

    /// API key (supports environment variable interpolation)
    pub api_key: SecretString,

    /// Base URL for the provider API
    pub base_url: String,

    /// Endpoint path override; `{model}` expands to the model id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Whether this provider is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Models served by this provider
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// Adapter construction strategy for a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Generic adapter speaking the compatible Images API
    OpenaiCompat,
    /// Bespoke Stability text-to-image adapter
    Stability,
}

/// Capability declaration for one model
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntry {
    /// Model identifier (e.g., "cogview-4")
    pub id: String,

    /// Standard parameters this model accepts
    #[serde(default)]
    pub supported_parameters: Vec<String>,

    /// Defaults injected when the caller omits a parameter
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub defaults: HashMap<String, serde_json::Value>,

    /// Per-model constraint narrowing
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub overrides: HashMap<String, Constraint>,
}
