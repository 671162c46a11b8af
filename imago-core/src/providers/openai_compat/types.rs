//! OpenAI Images API types
//!
//! These types match the widely adopted Images API shape and are used for
//! serialization when talking to OpenAI-compatible providers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Image generation request in the OpenAI-compatible shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesRequest {
    pub model: String,
    pub prompt: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Vendor extensions (negative_prompt, steps, cfg, ...) carried
    /// through flattened, so compatible vendors see their native names.
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Image generation response in the OpenAI-compatible shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub created: i64,
    pub data: Vec<ImageObject>,
}

/// One generated image entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}
