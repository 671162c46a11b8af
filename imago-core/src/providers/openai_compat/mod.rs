//! Generic adapter for OpenAI-compatible providers
//!
//! Most hosted image APIs speak a close dialect of the OpenAI Images API.
//! This adapter covers all of them with one implementation: request and
//! response conversion default to the compatible shape and can be replaced
//! per provider with custom conversion functions, so a vendor with a small
//! divergence gets a closure instead of a whole new adapter.

pub mod types;

use super::adapter::{ConnectionConfig, ImageProvider, ProviderFailure};
use crate::http::{RequestOptions, Transport};
use crate::protocol::{GeneratedImage, ImageGenerationResponse, ResolvedRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use types::{ImagesRequest, ImagesResponse};

/// Default endpoint of the compatible Images API
const DEFAULT_ENDPOINT: &str = "/images/generations";

/// Parameters the default request conversion maps to named fields;
/// everything else is passed through as a vendor extension.
const MAPPED_PARAMETERS: &[&str] = &["n", "size", "quality", "style", "response_format", "seed"];

/// Custom request conversion: resolved request -> native JSON body
pub type RequestConversion =
    Box<dyn Fn(&ResolvedRequest) -> Result<Value, ProviderFailure> + Send + Sync>;

/// Custom response conversion: native JSON body -> standard response
pub type ResponseConversion =
    Box<dyn Fn(&ResolvedRequest, Value) -> Result<ImageGenerationResponse, ProviderFailure> + Send + Sync>;

/// Adapter for providers speaking the OpenAI-compatible Images API.
pub struct OpenAiCompatAdapter {
    provider_id: String,
    config: ConnectionConfig,
    transport: Arc<dyn Transport>,
    request_conversion: Option<RequestConversion>,
    response_conversion: Option<ResponseConversion>,
}

impl OpenAiCompatAdapter {
    /// Create an adapter with the default conversions
    pub fn new(
        provider_id: impl Into<String>,
        config: ConnectionConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            config,
            transport,
            request_conversion: None,
            response_conversion: None,
        }
    }

    /// Replace the request conversion for this provider
    pub fn with_request_conversion(mut self, conversion: RequestConversion) -> Self {
        self.request_conversion = Some(conversion);
        self
    }

    /// Replace the response conversion for this provider
    pub fn with_response_conversion(mut self, conversion: ResponseConversion) -> Self {
        self.response_conversion = Some(conversion);
        self
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.config.api_key.expose_secret()),
        );
        headers
    }
}

/// Default conversion into the compatible request shape.
pub fn default_request(resolved: &ResolvedRequest) -> ImagesRequest {
    let extra: HashMap<String, Value> = resolved
        .parameters
        .iter()
        .filter(|(name, _)| !MAPPED_PARAMETERS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    ImagesRequest {
        model: resolved.model_id.clone(),
        prompt: resolved.prompt.clone(),
        n: resolved.param_u32("n"),
        size: resolved.param_str("size").map(str::to_string),
        quality: resolved.param_str("quality").map(str::to_string),
        style: resolved.param_str("style").map(str::to_string),
        response_format: resolved.param_str("response_format").map(str::to_string),
        seed: resolved.param_u64("seed"),
        extra,
    }
}

/// Default conversion out of the compatible response shape.
///
/// Image order is preserved; dimensions are filled from the resolved
/// request when the caller pinned them, since the wire shape does not
/// report them.
pub fn default_response(
    resolved: &ResolvedRequest,
    raw: Value,
) -> Result<ImageGenerationResponse, ProviderFailure> {
    let response: ImagesResponse = serde_json::from_value(raw)?;
    let dimensions = resolved.dimensions();

    let images = response
        .data
        .into_iter()
        .map(|image| {
            let mut entry = GeneratedImage {
                url: image.url,
                b64_json: image.b64_json,
                width: None,
                height: None,
            };
            if let Some((width, height)) = dimensions {
                entry = entry.with_dimensions(width, height);
            }
            entry
        })
        .collect();

    Ok(ImageGenerationResponse {
        created: response.created,
        images,
    })
}

#[async_trait]
impl ImageProvider for OpenAiCompatAdapter {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    async fn generate(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ImageGenerationResponse, ProviderFailure> {
        let body = match &self.request_conversion {
            Some(convert) => convert(request)?,
            None => serde_json::to_value(default_request(request))?,
        };

        let url = self.config.url_for(DEFAULT_ENDPOINT, &request.model_id);
        let options = RequestOptions::new().with_timeout(self.config.timeout);

        let raw = self
            .transport
            .post_json(&url, &self.headers(), &body, &options)
            .await
            .map_err(ProviderFailure::from)?;

        let response = match &self.response_conversion {
            Some(convert) => convert(request, raw)?,
            None => default_response(request, raw)?,
        };

        if response.images.is_empty() {
            return Err(ProviderFailure::empty_batch());
        }

        Ok(response)
    }
}
