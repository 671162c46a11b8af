//! HTTP error payload mapping

use super::TransportFailure;
use reqwest::StatusCode;
use serde_json::Value;

/// Map a non-success HTTP status and its body to a transport failure.
///
/// The body is inspected for the common provider error envelopes so the
/// upstream's own message and code survive classification.
pub fn map_status(status: StatusCode, body: Option<&str>) -> TransportFailure {
    let details = body
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_details(&v));

    let (code, message) = match details {
        Some(d) => (d.code, d.message),
        None => (
            None,
            body.map(str::to_string)
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16())),
        ),
    };

    TransportFailure::Status {
        status: status.as_u16(),
        code,
        message,
    }
}

/// Error details extracted from a response body
struct ErrorDetails {
    message: String,
    code: Option<String>,
}

/// Extract error details from the common JSON error envelopes.
fn extract_error_details(json: &Value) -> Option<ErrorDetails> {
    // OpenAI format: { "error": { "message": "...", "type": "...", "code": "..." } }
    if let Some(error) = json.get("error") {
        if let Some(message) = error.get("message").and_then(|v| v.as_str()) {
            let code = error
                .get("code")
                .and_then(|v| v.as_str())
                .or_else(|| error.get("type").and_then(|v| v.as_str()))
                .map(str::to_string);
            return Some(ErrorDetails {
                message: message.to_string(),
                code,
            });
        }

        // Flat string form: { "error": "..." }
        if let Some(message) = error.as_str() {
            return Some(ErrorDetails {
                message: message.to_string(),
                code: None,
            });
        }
    }

    // Generic format: { "message": "...", "code": ... }
    if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
        let code = json
            .get("code")
            .map(|c| c.as_str().map(str::to_string).unwrap_or_else(|| c.to_string()));
        return Some(ErrorDetails {
            message: message.to_string(),
            code,
        });
    }

    None
}
