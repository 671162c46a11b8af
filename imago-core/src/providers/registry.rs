//! Adapter registry
//!
//! Binds provider identifiers to adapter instances. Registration happens
//! once at startup; the built registry is immutable, so concurrent
//! requests read it without coordination.

use super::adapter::ImageProvider;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable provider-id -> adapter mapping.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ImageProvider>>,
}

impl AdapterRegistry {
    /// Start building a registry
    pub fn builder() -> AdapterRegistryBuilder {
        AdapterRegistryBuilder::default()
    }

    /// Look up the adapter for a provider id
    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn ImageProvider>> {
        self.adapters.get(provider_id).cloned()
    }

    /// Registered provider ids, sorted
    pub fn provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered adapters
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapters are registered
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Builder collecting adapters before the registry is frozen.
#[derive(Default)]
pub struct AdapterRegistryBuilder {
    adapters: HashMap<String, Arc<dyn ImageProvider>>,
}

impl AdapterRegistryBuilder {
    /// Register an adapter under its own provider id.
    /// Registering the same id twice keeps the later adapter.
    pub fn register(mut self, adapter: Arc<dyn ImageProvider>) -> Self {
        self.adapters
            .insert(adapter.provider_id().to_string(), adapter);
        self
    }

    /// Freeze the registry
    pub fn build(self) -> AdapterRegistry {
        AdapterRegistry {
            adapters: self.adapters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ImageGenerationResponse, ResolvedRequest};
    use crate::providers::adapter::ProviderFailure;
    use async_trait::async_trait;

    struct StubAdapter {
        id: String,
    }

    #[async_trait]
    impl ImageProvider for StubAdapter {
        fn provider_id(&self) -> &str {
            &self.id
        }

        async fn generate(
            &self,
            _request: &ResolvedRequest,
        ) -> Result<ImageGenerationResponse, ProviderFailure> {
            Err(ProviderFailure::empty_batch())
        }
    }

    #[test]
    fn test_lookup_by_provider_id() {
        let registry = AdapterRegistry::builder()
            .register(Arc::new(StubAdapter {
                id: "zhipu".to_string(),
            }))
            .register(Arc::new(StubAdapter {
                id: "stability".to_string(),
            }))
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("zhipu").is_some());
        assert!(registry.get("nonexistent-provider").is_none());
        assert_eq!(registry.provider_ids(), vec!["stability", "zhipu"]);
    }

    #[test]
    fn test_later_registration_wins() {
        let registry = AdapterRegistry::builder()
            .register(Arc::new(StubAdapter {
                id: "zhipu".to_string(),
            }))
            .register(Arc::new(StubAdapter {
                id: "zhipu".to_string(),
            }))
            .build();

        assert_eq!(registry.len(), 1);
    }
}
