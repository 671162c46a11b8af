//! Parameter schema and model capability descriptors
//!
//! This module holds the two pieces of process-wide, read-only data the
//! resolver works from: the standard parameter schema (the canonical
//! vocabulary of request fields) and the model catalog (which parameters
//! each model accepts, with defaults and per-model constraint narrowing).

pub mod constraints;
pub mod model;
pub mod schema;

pub use constraints::Constraint;
pub use model::{ModelCapability, ModelCatalog};
pub use schema::{ParameterSchema, ParameterSpec, SemanticType};
