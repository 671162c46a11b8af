//! Provider abstraction layer
//!
//! One polymorphic adapter per provider family, selected through the
//! registry rather than by branching on provider identity. The generic
//! OpenAI-compatible adapter covers conforming vendors; providers whose
//! shape diverges too far get a bespoke implementation of the same trait.

pub mod adapter;
pub mod openai_compat;
pub mod registry;
pub mod stability;

pub use adapter::{ConnectionConfig, ImageProvider, ProviderFailure};
pub use openai_compat::OpenAiCompatAdapter;
pub use registry::{AdapterRegistry, AdapterRegistryBuilder};
pub use stability::StabilityAdapter;
