//! Protocol module for image-generation request/response structures
//!
//! This module defines the canonical data models for interacting with
//! image-generation providers. These structures are designed to be:
//! - Provider-agnostic
//! - Immutable after construction
//! - Type-safe and serializable

pub mod types;

pub use types::{
    GeneratedImage, ImageGenerationRequest, ImageGenerationResponse, ResolvedRequest,
};
