//! Core protocol types for image generation
//!
//! This module contains the fundamental data structures that cross the
//! system boundary. The design prioritizes:
//! - Type safety through strong typing
//! - Provider independence (no upstream shape leaks into these types)
//! - Per-call immutability: values are constructed fresh for each request
//!   and never mutated afterwards

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A caller-supplied image generation request.
///
/// `prompt` is the only required field. Everything else is carried in
/// `parameters`, keyed by standard parameter name; unsupported or invalid
/// entries are rejected during resolution, never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    /// Target model identifier (e.g., "cogview-4")
    pub model_id: String,

    /// The text prompt describing the desired image
    pub prompt: String,

    /// Standard parameters by name (size, seed, steps, cfg, ...)
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub parameters: HashMap<String, serde_json::Value>,
}

impl ImageGenerationRequest {
    /// Create a new request with just a model and prompt
    pub fn new(model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            prompt: prompt.into(),
            parameters: HashMap::new(),
        }
    }

    /// Attach a standard parameter
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// A request that has passed resolution against a model capability.
///
/// Every parameter present here is supported by the target model and has
/// been validated against its constraint; omitted parameters with catalog
/// defaults have been filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    /// Target model identifier
    pub model_id: String,

    /// Provider that serves the target model
    pub provider_id: String,

    /// Validated, non-empty prompt
    pub prompt: String,

    /// Fully defaulted and validated parameters
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub parameters: HashMap<String, serde_json::Value>,
}

impl ResolvedRequest {
    /// Look up a string parameter
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).and_then(|v| v.as_str())
    }

    /// Look up a numeric parameter as u32
    pub fn param_u32(&self, name: &str) -> Option<u32> {
        self.parameters
            .get(name)
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
    }

    /// Look up a numeric parameter as u64
    pub fn param_u64(&self, name: &str) -> Option<u64> {
        self.parameters.get(name).and_then(|v| v.as_u64())
    }

    /// Look up a numeric parameter as f32
    pub fn param_f32(&self, name: &str) -> Option<f32> {
        self.parameters
            .get(name)
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
    }

    /// Target dimensions, derived from explicit `width`/`height` parameters
    /// or from a `size` string of the form "WxH".
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        if let (Some(w), Some(h)) = (self.param_u32("width"), self.param_u32("height")) {
            return Some((w, h));
        }
        parse_size(self.param_str("size")?)
    }
}

/// Parse a "WxH" size string into a (width, height) pair
pub fn parse_size(size: &str) -> Option<(u32, u32)> {
    let (w, h) = size.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// A single generated image.
///
/// Exactly one of `url` or `b64_json` is populated by well-behaved
/// providers; dimensions are reported when the provider (or the request)
/// makes them known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// URL the image can be fetched from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Base64-encoded image payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    /// Image width in pixels, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Image height in pixels, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl GeneratedImage {
    /// Create an image entry backed by a URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            b64_json: None,
            width: None,
            height: None,
        }
    }

    /// Create an image entry backed by base64 data
    pub fn from_b64(data: impl Into<String>) -> Self {
        Self {
            url: None,
            b64_json: Some(data.into()),
            width: None,
            height: None,
        }
    }

    /// Attach known dimensions
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// The unified generation result.
///
/// Identical in structure regardless of which provider produced it. The
/// `images` sequence preserves provider order and is never empty on
/// success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    /// Unix timestamp (seconds) the batch was created at
    pub created: i64,

    /// Generated images, in provider order
    pub images: Vec<GeneratedImage>,
}

impl ImageGenerationResponse {
    /// Current unix timestamp in seconds, for providers that do not
    /// report a creation time themselves.
    pub fn now_timestamp() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}
