//! Provider adapter trait and connection configuration
//!
//! Defines the core abstraction every image provider implements. Adapters
//! convert a resolved standard request into their provider's native call
//! shape, make exactly one transport call, and convert the native response
//! back. They never retry and never swallow failures.

use crate::config::SecretString;
use crate::http::TransportFailure;
use crate::protocol::{ImageGenerationResponse, ResolvedRequest};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failures an adapter can surface.
///
/// This is the adapter-internal taxonomy; the error classifier folds it
/// into the caller-facing [`crate::error::ClassifiedError`].
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// No interpretable provider response was obtained
    #[error("transport failure: {0}")]
    Transport(#[source] TransportFailure),

    /// The provider received the request and rejected or failed it
    #[error("upstream error{}: {message}", .code.as_deref().map(|c| format!(" [{}]", c)).unwrap_or_default())]
    Upstream {
        /// HTTP status, when the rejection came over HTTP
        status: Option<u16>,
        /// Provider-reported error code, when present
        code: Option<String>,
        /// Provider-reported message, preserved verbatim
        message: String,
    },

    /// The request or response could not be converted to/from the
    /// provider's native shape
    #[error("conversion failure: {message}")]
    Conversion { message: String },
}

impl ProviderFailure {
    /// An upstream failure for a success response that carried no images.
    /// Batches are all-or-nothing; partial results are not surfaced.
    pub fn empty_batch() -> Self {
        ProviderFailure::Upstream {
            status: None,
            code: Some("empty_batch".to_string()),
            message: "provider response contained no images".to_string(),
        }
    }
}

impl From<TransportFailure> for ProviderFailure {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            // A status response is the upstream speaking; everything else
            // means the network failed us.
            TransportFailure::Status {
                status,
                code,
                message,
            } => ProviderFailure::Upstream {
                status: Some(status),
                code,
                message,
            },
            other => ProviderFailure::Transport(other),
        }
    }
}

impl From<serde_json::Error> for ProviderFailure {
    fn from(err: serde_json::Error) -> Self {
        ProviderFailure::Conversion {
            message: err.to_string(),
        }
    }
}

/// Core trait every image provider adapter implements.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Identifier this adapter is registered under
    fn provider_id(&self) -> &str;

    /// Generate images for a resolved request.
    ///
    /// Makes exactly one outbound call; image order in the response
    /// preserves the provider's order.
    async fn generate(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ImageGenerationResponse, ProviderFailure>;
}

/// Connection settings shared by all adapter kinds.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of the provider API (no trailing slash required)
    pub base_url: String,

    /// API key, redacted in logs
    pub api_key: SecretString,

    /// Endpoint path override; `{model}` expands to the model id.
    /// Adapters supply their conventional default when absent.
    pub endpoint: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Create a config with the default timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<SecretString>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            endpoint: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Override the endpoint path
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the full request URL for a model.
    pub fn url_for(&self, default_endpoint: &str, model_id: &str) -> String {
        let endpoint = self
            .endpoint
            .as_deref()
            .unwrap_or(default_endpoint)
            .replace("{model}", model_id);
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}
