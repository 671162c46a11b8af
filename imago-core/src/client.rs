//! The public entry point
//!
//! [`GenerationClient`] bundles the three pieces of process-wide read-only
//! state (parameter schema, model catalog, adapter registry) and exposes
//! the single boundary operation: generate an image for a provider with a
//! standard request. Everything per-call is created fresh, so any number
//! of calls may run concurrently without coordination.

use crate::capabilities::{ModelCapability, ModelCatalog, ParameterSchema};
use crate::config::{ImagoConfig, ProviderKind};
use crate::error::{ClassifiedError, ImagoResult};
use crate::http::Transport;
use crate::protocol::{ImageGenerationRequest, ImageGenerationResponse};
use crate::providers::{
    AdapterRegistry, ConnectionConfig, ImageProvider, OpenAiCompatAdapter, StabilityAdapter,
};
use crate::resolver::resolve;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Unified client over all configured image-generation providers.
pub struct GenerationClient {
    schema: ParameterSchema,
    catalog: ModelCatalog,
    registry: AdapterRegistry,
}

impl GenerationClient {
    /// Assemble a client from explicitly constructed parts.
    ///
    /// Tests use this to build isolated instances; production code
    /// usually goes through [`GenerationClient::from_config`].
    pub fn new(schema: ParameterSchema, catalog: ModelCatalog, registry: AdapterRegistry) -> Self {
        Self {
            schema,
            catalog,
            registry,
        }
    }

    /// Wire schema, catalog, and registry from a validated configuration.
    pub fn from_config(config: &ImagoConfig, transport: Arc<dyn Transport>) -> Self {
        let mut catalog = ModelCatalog::new();
        let mut builder = AdapterRegistry::builder();

        for provider in config.providers.iter().filter(|p| p.enabled) {
            let mut connection =
                ConnectionConfig::new(provider.base_url.clone(), provider.api_key.clone());
            if let Some(endpoint) = &provider.endpoint {
                connection = connection.with_endpoint(endpoint.clone());
            }
            if let Some(secs) = provider.timeout_secs {
                connection = connection.with_timeout(Duration::from_secs(secs));
            }

            let adapter: Arc<dyn ImageProvider> = match provider.kind {
                ProviderKind::OpenaiCompat => Arc::new(OpenAiCompatAdapter::new(
                    provider.id.clone(),
                    connection,
                    transport.clone(),
                )),
                ProviderKind::Stability => Arc::new(StabilityAdapter::new(
                    provider.id.clone(),
                    connection,
                    transport.clone(),
                )),
            };
            builder = builder.register(adapter);

            for model in &provider.models {
                catalog.insert(ModelCapability {
                    model_id: model.id.clone(),
                    provider_id: provider.id.clone(),
                    supported_parameters: model.supported_parameters.iter().cloned().collect(),
                    defaults: model.defaults.clone(),
                    overrides: model.overrides.clone(),
                });
            }
        }

        Self::new(ParameterSchema::standard(), catalog, builder.build())
    }

    /// The registered provider ids, sorted
    pub fn provider_ids(&self) -> Vec<&str> {
        self.registry.provider_ids()
    }

    /// Generate images for a standard request via the named provider.
    ///
    /// Validation and resolution happen before any network call; all
    /// failures come back as a [`ClassifiedError`] the caller can branch
    /// on by kind. This layer never retries.
    pub async fn generate_image(
        &self,
        provider_id: &str,
        request: &ImageGenerationRequest,
    ) -> ImagoResult<ImageGenerationResponse> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            provider = provider_id,
            model = %request.model_id,
            "dispatching image generation"
        );

        let adapter = self
            .registry
            .get(provider_id)
            .ok_or_else(|| ClassifiedError::unknown_provider(provider_id))?;

        let capability = self.catalog.get(&request.model_id).ok_or_else(|| {
            ClassifiedError::validation(
                provider_id,
                format!("unknown model '{}'", request.model_id),
            )
        })?;

        if capability.provider_id != provider_id {
            return Err(ClassifiedError::validation(
                provider_id,
                format!(
                    "model '{}' is served by provider '{}', not '{}'",
                    request.model_id, capability.provider_id, provider_id
                ),
            ));
        }

        let resolved = resolve(&self.schema, request, capability)
            .map_err(|e| ClassifiedError::from_resolve(e, provider_id))?;
        debug!(%request_id, parameters = resolved.parameters.len(), "request resolved");

        let response = adapter.generate(&resolved).await.map_err(|e| {
            let classified = ClassifiedError::from_provider(e, provider_id);
            warn!(%request_id, kind = ?classified.kind, "image generation failed");
            classified
        })?;

        info!(%request_id, images = response.images.len(), "image generation succeeded");
        Ok(response)
    }
}
