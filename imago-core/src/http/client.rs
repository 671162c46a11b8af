//! HTTP transport implementation using reqwest

use super::{error::map_status, RequestOptions, Transport, TransportFailure};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Maximum response size (10MB)
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Default user agent
const USER_AGENT: &str = concat!("imago/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP transport with connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    /// The underlying reqwest client
    client: Arc<Client>,

    /// Maximum response size to prevent OOM
    max_response_size: usize,
}

impl HttpTransport {
    /// Create a transport with default settings
    pub fn new() -> Result<Self, TransportFailure> {
        Self::with_config(Duration::from_secs(10), 10)
    }

    /// Create a transport with custom connection settings.
    ///
    /// Per-request timeouts come from [`RequestOptions`], not the client,
    /// so one pooled client serves providers with different deadlines.
    pub fn with_config(
        connect_timeout: Duration,
        max_idle_per_host: usize,
    ) -> Result<Self, TransportFailure> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| TransportFailure::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client: Arc::new(client),
            max_response_size: MAX_RESPONSE_SIZE,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
        body: &Value,
        options: &RequestOptions,
    ) -> Result<Value, TransportFailure> {
        let request_id = options.request_id;

        info!(%request_id, url, "executing provider request");

        let mut req_builder = self
            .client
            .post(url)
            .timeout(options.timeout)
            .json(body)
            .header("X-Request-ID", request_id.to_string());

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(%request_id, timeout = ?options.timeout, "provider request timed out");
                TransportFailure::Timeout(options.timeout)
            } else if e.is_connect() {
                error!(%request_id, error = %e, "connection to provider failed");
                TransportFailure::Connect {
                    message: e.to_string(),
                }
            } else {
                error!(%request_id, error = %e, "provider request failed");
                TransportFailure::Network {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        debug!(%request_id, status = status.as_u16(), "provider responded");

        if !status.is_success() {
            // Error bodies are buffered too, so they get the same cap.
            if let Some(content_length) = response.content_length() {
                if content_length as usize > self.max_response_size {
                    return Err(TransportFailure::ResponseTooLarge {
                        size: content_length as usize,
                        limit: self.max_response_size,
                    });
                }
            }
            let body = response.text().await.ok();
            if let Some(body) = &body {
                if body.len() > self.max_response_size {
                    return Err(TransportFailure::ResponseTooLarge {
                        size: body.len(),
                        limit: self.max_response_size,
                    });
                }
            }
            warn!(%request_id, status = status.as_u16(), "provider returned an error status");
            return Err(map_status(status, body.as_deref()));
        }

        // Guard against oversized bodies before buffering them.
        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_size {
                return Err(TransportFailure::ResponseTooLarge {
                    size: content_length as usize,
                    limit: self.max_response_size,
                });
            }
        }

        let is_json = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_lowercase().contains("application/json"))
            .unwrap_or(true);
        if !is_json {
            return Err(TransportFailure::MalformedBody {
                message: "expected an application/json response".to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportFailure::Network {
                message: format!("failed to read response body: {}", e),
            })?;

        if text.len() > self.max_response_size {
            return Err(TransportFailure::ResponseTooLarge {
                size: text.len(),
                limit: self.max_response_size,
            });
        }

        let json = serde_json::from_str(&text).map_err(|e| {
            error!(%request_id, error = %e, "provider returned unparseable JSON");
            TransportFailure::MalformedBody {
                message: e.to_string(),
            }
        })?;

        info!(%request_id, "provider request completed");
        Ok(json)
    }
}
