//! HTTP transport for provider adapters
//!
//! This module implements the outbound side of the system:
//! - the [`Transport`] trait adapters call through (mockable in tests)
//! - a pooled reqwest implementation with timeouts and size limits
//! - mapping of HTTP status codes and error payloads to failures
//! - request ID generation for log correlation

pub mod client;
pub mod error;

pub use client::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Options for a single outbound request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Unique request ID for correlation
    pub request_id: Uuid,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RequestOptions {
    /// Create options with a fresh request ID
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for this request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Failures observed at or below the HTTP layer.
///
/// `Status` carries a response the upstream actually produced; everything
/// else means no interpretable provider response was obtained.
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// The request did not complete within the timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// TCP/TLS connection could not be established
    #[error("connection failed: {message}")]
    Connect { message: String },

    /// Any other network-level failure
    #[error("network error: {message}")]
    Network { message: String },

    /// The body could not be read or was not valid JSON
    #[error("malformed response body: {message}")]
    MalformedBody { message: String },

    /// The body exceeded the configured size cap
    #[error("response size {size} exceeds limit {limit}")]
    ResponseTooLarge { size: usize, limit: usize },

    /// The upstream answered with a non-success status
    #[error("upstream returned {status}: {message}")]
    Status {
        status: u16,
        /// Error code extracted from the payload, when present
        code: Option<String>,
        message: String,
    },
}

/// The outbound network seam every adapter calls through.
///
/// Implementations make exactly one network call per invocation and never
/// retry; retry policy belongs to this layer's callers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body and return the parsed JSON response.
    async fn post_json(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<Value, TransportFailure>;
}
