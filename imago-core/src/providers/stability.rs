//! Bespoke adapter for the Stability text-to-image API
//!
//! Stability's REST shape diverges too far from the compatible Images API
//! for the generic conversions to express economically: prompts are
//! weighted entries, geometry is explicit width/height, and results come
//! back as base64 `artifacts`. This adapter owns that native shape.

use super::adapter::{ConnectionConfig, ImageProvider, ProviderFailure};
use crate::http::{RequestOptions, Transport};
use crate::protocol::{GeneratedImage, ImageGenerationResponse, ResolvedRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Default endpoint template; `{model}` expands to the engine id
const DEFAULT_ENDPOINT: &str = "/v1/generation/{model}/text-to-image";

/// Native request shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StabilityRequest {
    text_prompts: Vec<TextPrompt>,

    #[serde(skip_serializing_if = "Option::is_none")]
    cfg_scale: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    samples: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    style_preset: Option<String>,
}

/// A weighted prompt entry; negative prompts carry a negative weight
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextPrompt {
    text: String,
    weight: f32,
}

/// Native response shape
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StabilityResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Artifact {
    base64: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,

    #[serde(rename = "finishReason", skip_serializing_if = "Option::is_none")]
    finish_reason: Option<String>,
}

/// Adapter for Stability-style text-to-image endpoints.
pub struct StabilityAdapter {
    provider_id: String,
    config: ConnectionConfig,
    transport: Arc<dyn Transport>,
}

impl StabilityAdapter {
    pub fn new(
        provider_id: impl Into<String>,
        config: ConnectionConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            config,
            transport,
        }
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.config.api_key.expose_secret()),
        );
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }
}

/// Convert a resolved request into the native shape.
///
/// `size` strings become the explicit width/height pair the API expects;
/// explicit `width`/`height` parameters take precedence.
fn to_native_request(resolved: &ResolvedRequest) -> StabilityRequest {
    let mut text_prompts = vec![TextPrompt {
        text: resolved.prompt.clone(),
        weight: 1.0,
    }];
    if let Some(negative) = resolved.param_str("negative_prompt") {
        text_prompts.push(TextPrompt {
            text: negative.to_string(),
            weight: -1.0,
        });
    }

    let (width, height) = match resolved.dimensions() {
        Some((w, h)) => (Some(w), Some(h)),
        None => (None, None),
    };

    StabilityRequest {
        text_prompts,
        cfg_scale: resolved.param_f32("cfg"),
        width,
        height,
        samples: resolved.param_u32("n"),
        steps: resolved.param_u32("steps"),
        seed: resolved.param_u64("seed"),
        style_preset: resolved.param_str("style").map(str::to_string),
    }
}

/// Convert a native response into the standard shape.
fn from_native_response(
    resolved: &ResolvedRequest,
    response: StabilityResponse,
) -> Result<ImageGenerationResponse, ProviderFailure> {
    // All-or-nothing: a single failed artifact fails the whole batch.
    if let Some(failed) = response
        .artifacts
        .iter()
        .find(|a| matches!(a.finish_reason.as_deref(), Some("ERROR") | Some("CONTENT_FILTERED")))
    {
        return Err(ProviderFailure::Upstream {
            status: None,
            code: failed.finish_reason.clone(),
            message: "provider reported a failed artifact in the batch".to_string(),
        });
    }

    let dimensions = resolved.dimensions();
    let images = response
        .artifacts
        .into_iter()
        .map(|artifact| {
            let mut entry = GeneratedImage::from_b64(artifact.base64);
            if let Some((width, height)) = dimensions {
                entry = entry.with_dimensions(width, height);
            }
            entry
        })
        .collect();

    Ok(ImageGenerationResponse {
        created: ImageGenerationResponse::now_timestamp(),
        images,
    })
}

#[async_trait]
impl ImageProvider for StabilityAdapter {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    async fn generate(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ImageGenerationResponse, ProviderFailure> {
        let body = serde_json::to_value(to_native_request(request))?;
        let url = self.config.url_for(DEFAULT_ENDPOINT, &request.model_id);
        let options = RequestOptions::new().with_timeout(self.config.timeout);

        let raw = self
            .transport
            .post_json(&url, &self.headers(), &body, &options)
            .await
            .map_err(ProviderFailure::from)?;

        let native: StabilityResponse = serde_json::from_value(raw)?;
        let response = from_native_response(request, native)?;

        if response.images.is_empty() {
            return Err(ProviderFailure::empty_batch());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolved_with(parameters: Vec<(&str, serde_json::Value)>) -> ResolvedRequest {
        ResolvedRequest {
            model_id: "sd3-large".to_string(),
            provider_id: "stability".to_string(),
            prompt: "a lighthouse in a storm".to_string(),
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    #[test]
    fn test_size_becomes_width_height() {
        let resolved = resolved_with(vec![
            ("size", json!("1024x768")),
            ("cfg", json!(7.5)),
            ("steps", json!(30)),
        ]);

        let native = to_native_request(&resolved);
        assert_eq!(native.width, Some(1024));
        assert_eq!(native.height, Some(768));
        assert_eq!(native.cfg_scale, Some(7.5));
        assert_eq!(native.steps, Some(30));
    }

    #[test]
    fn test_negative_prompt_gets_negative_weight() {
        let resolved = resolved_with(vec![("negative_prompt", json!("blurry, low quality"))]);

        let native = to_native_request(&resolved);
        assert_eq!(native.text_prompts.len(), 2);
        assert_eq!(native.text_prompts[0].weight, 1.0);
        assert_eq!(native.text_prompts[1].text, "blurry, low quality");
        assert_eq!(native.text_prompts[1].weight, -1.0);
    }

    #[test]
    fn test_artifacts_map_to_ordered_images() {
        let resolved = resolved_with(vec![("size", json!("512x512"))]);
        let native = StabilityResponse {
            artifacts: vec![
                Artifact {
                    base64: "first".to_string(),
                    seed: Some(1),
                    finish_reason: Some("SUCCESS".to_string()),
                },
                Artifact {
                    base64: "second".to_string(),
                    seed: Some(2),
                    finish_reason: Some("SUCCESS".to_string()),
                },
            ],
        };

        let response = from_native_response(&resolved, native).unwrap();
        assert_eq!(response.images.len(), 2);
        assert_eq!(response.images[0].b64_json.as_deref(), Some("first"));
        assert_eq!(response.images[1].b64_json.as_deref(), Some("second"));
        assert_eq!(response.images[0].width, Some(512));
    }

    #[test]
    fn test_failed_artifact_fails_the_batch() {
        let resolved = resolved_with(vec![]);
        let native = StabilityResponse {
            artifacts: vec![
                Artifact {
                    base64: "ok".to_string(),
                    seed: None,
                    finish_reason: Some("SUCCESS".to_string()),
                },
                Artifact {
                    base64: String::new(),
                    seed: None,
                    finish_reason: Some("CONTENT_FILTERED".to_string()),
                },
            ],
        };

        let err = from_native_response(&resolved, native).unwrap_err();
        assert!(matches!(
            err,
            ProviderFailure::Upstream { ref code, .. }
                if code.as_deref() == Some("CONTENT_FILTERED")
        ));
    }
}
