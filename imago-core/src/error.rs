//! Error classification
//!
//! Every failure that crosses the system boundary is a [`ClassifiedError`]:
//! one tagged type with a `kind` callers can branch on, the provider it
//! belongs to, a human-readable message, and the original cause preserved
//! as an error source. No raw provider-specific error ever escapes.

use crate::providers::ProviderFailure;
use crate::resolver::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for boundary operations
pub type ImagoResult<T> = Result<T, ClassifiedError>;

/// Uniform failure taxonomy across all providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller-input error, detected before any network call
    Validation,
    /// Caller requested a field the target model does not support
    UnsupportedParameter,
    /// The provider received the request and rejected or failed it
    Upstream,
    /// Network-level failure with no interpretable provider response
    Transport,
    /// No adapter is registered for the requested provider
    UnknownProvider,
}

impl ErrorKind {
    /// Whether a caller could reasonably retry the same request.
    /// Only transport failures are; resending a rejected or invalid
    /// request would just be rejected again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Transport)
    }

    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::UnsupportedParameter => "unsupported parameter",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Transport => "transport",
            ErrorKind::UnknownProvider => "unknown provider",
        }
    }
}

/// The sole error type callers see.
///
/// Constructed only by the classifier functions below; adapters and the
/// resolver raise their own internal failure types.
#[derive(Debug, Error)]
pub struct ClassifiedError {
    /// Failure taxonomy entry
    pub kind: ErrorKind,

    /// Provider the request was addressed to
    pub provider_id: String,

    /// Human-readable description
    pub message: String,

    /// Original cause, preserved for diagnostics
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error (provider '{}'): {}",
            self.kind.as_str(),
            self.provider_id,
            self.message
        )
    }
}

impl ClassifiedError {
    /// Classify a resolver failure, preserving its original kind.
    pub fn from_resolve(err: ResolveError, provider_id: &str) -> Self {
        let kind = match err {
            ResolveError::UnsupportedParameter { .. } => ErrorKind::UnsupportedParameter,
            _ => ErrorKind::Validation,
        };
        Self {
            kind,
            provider_id: provider_id.to_string(),
            message: err.to_string(),
            cause: Some(Box::new(err)),
        }
    }

    /// Classify an adapter failure.
    pub fn from_provider(err: ProviderFailure, provider_id: &str) -> Self {
        let kind = match err {
            ProviderFailure::Upstream { .. } => ErrorKind::Upstream,
            // A conversion failure means the provider's response could not
            // be interpreted, which callers treat like a transport fault.
            ProviderFailure::Transport(_) | ProviderFailure::Conversion { .. } => {
                ErrorKind::Transport
            }
        };
        Self {
            kind,
            provider_id: provider_id.to_string(),
            message: err.to_string(),
            cause: Some(Box::new(err)),
        }
    }

    /// A request for a provider with no registered adapter.
    pub fn unknown_provider(provider_id: &str) -> Self {
        Self {
            kind: ErrorKind::UnknownProvider,
            provider_id: provider_id.to_string(),
            message: format!("no adapter registered for provider '{}'", provider_id),
            cause: None,
        }
    }

    /// A locally detectable caller error outside the resolver (e.g., an
    /// unknown model id).
    pub fn validation(provider_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            provider_id: provider_id.to_string(),
            message: message.into(),
            cause: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::TransportFailure;
    use std::error::Error as _;
    use std::time::Duration;

    #[test]
    fn test_resolver_kinds_are_preserved() {
        let err = ClassifiedError::from_resolve(
            ResolveError::UnsupportedParameter {
                name: "unknownField".to_string(),
                model_id: "cogview-4".to_string(),
            },
            "zhipu",
        );
        assert_eq!(err.kind, ErrorKind::UnsupportedParameter);
        assert!(err.message.contains("unknownField"));

        let err = ClassifiedError::from_resolve(ResolveError::EmptyPrompt, "zhipu");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_transport_cause_is_preserved() {
        let failure = ProviderFailure::Transport(TransportFailure::Timeout(
            Duration::from_secs(5),
        ));
        let err = ClassifiedError::from_provider(failure, "stability");

        assert_eq!(err.kind, ErrorKind::Transport);
        assert!(err.kind.is_retryable());
        let cause = err.source().expect("cause must be preserved");
        assert!(cause.to_string().contains("timed out"));
    }

    #[test]
    fn test_upstream_message_survives() {
        let failure = ProviderFailure::Upstream {
            status: Some(400),
            code: Some("content_policy_violation".to_string()),
            message: "Your request was rejected".to_string(),
        };
        let err = ClassifiedError::from_provider(failure, "openai");

        assert_eq!(err.kind, ErrorKind::Upstream);
        assert!(!err.kind.is_retryable());
        assert!(err.message.contains("Your request was rejected"));
    }

    #[test]
    fn test_unknown_provider() {
        let err = ClassifiedError::unknown_provider("nonexistent-provider");
        assert_eq!(err.kind, ErrorKind::UnknownProvider);
        assert_eq!(err.provider_id, "nonexistent-provider");
    }
}
