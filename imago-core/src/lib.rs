//! Imago Core Library
//!
//! A uniform request/response contract over heterogeneous image-generation
//! APIs. Callers issue one standard request shape; the library resolves it
//! against the target model's declared capability, routes it to the
//! provider's adapter, and returns either a standard response or a
//! classified error. Provider heterogeneity never leaks to the caller.
//!
//! The typical flow:
//!
//! ```no_run
//! use imago_core::{GenerationClient, ImageGenerationRequest};
//! use imago_core::http::HttpTransport;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = imago_core::config::load_from_yaml("imago.yaml")?;
//! let transport = Arc::new(HttpTransport::new()?);
//! let client = GenerationClient::from_config(&config, transport);
//!
//! let request = ImageGenerationRequest::new("cogview-4", "a cat")
//!     .with_parameter("size", "1024x1024");
//! let response = client.generate_image("zhipu", &request).await?;
//!
//! for image in &response.images {
//!     println!("{:?}", image.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod providers;
pub mod resolver;

pub use capabilities::{Constraint, ModelCapability, ModelCatalog, ParameterSchema, ParameterSpec, SemanticType};
pub use client::GenerationClient;
pub use error::{ClassifiedError, ErrorKind, ImagoResult};
pub use protocol::{GeneratedImage, ImageGenerationRequest, ImageGenerationResponse, ResolvedRequest};
pub use providers::{AdapterRegistry, ImageProvider, ProviderFailure};
pub use resolver::{resolve, ResolveError};

/// Returns the version of the Imago Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
