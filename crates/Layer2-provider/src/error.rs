//! Provider-specific error types
//!
//! `ProviderError` carries backend detail; it converts into
//! `blnt_foundation::Error` at crate boundaries.

use blnt_foundation::Error as FoundationError;
use thiserror::Error;

/// Errors that can occur while talking to the LLM backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Connection refused, DNS, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Server error (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid request (bad parameters)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API key missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not pulled on the backend
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be built
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Map an HTTP status and body (`{"error": "..."}`,
    /// `{"error": {"message": "..."}}` or plain text)
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let message = error_message(body);
        match status {
            400 => ProviderError::InvalidRequest(message),
            401 | 403 => ProviderError::Authentication(message),
            404 => ProviderError::ModelNotFound(message),
            500..=599 => ProviderError::ServerError(message),
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, message)),
        }
    }

    /// Whether the backend was unreachable rather than refusing the request
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ProviderError::Network(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            let error = json.get("error")?;
            error
                .as_str()
                .or_else(|| error.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

// ============================================================================
// blnt_foundation::Error conversion
// ============================================================================

impl From<ProviderError> for FoundationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Network(msg) => FoundationError::Http(format!("Network: {}", msg)),
            ProviderError::ServerError(msg) => {
                FoundationError::Provider(format!("Server error: {}", msg))
            }
            ProviderError::Authentication(msg) => {
                FoundationError::Config(format!("Authentication failed: {}", msg))
            }
            ProviderError::InvalidRequest(msg) => FoundationError::InvalidInput(msg),
            ProviderError::ModelNotFound(msg) => {
                FoundationError::NotFound(format!("Model {}", msg))
            }
            ProviderError::InvalidResponse(msg) => {
                FoundationError::Provider(format!("Invalid response: {}", msg))
            }
            ProviderError::NotConfigured(msg) => FoundationError::Config(msg),
            ProviderError::Unknown(msg) => FoundationError::Provider(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert_eq!(
            ProviderError::from_http_status(404, r#"{"error":"model 'x' not found"}"#),
            ProviderError::ModelNotFound("model 'x' not found".to_string())
        );
        assert!(matches!(
            ProviderError::from_http_status(503, "busy"),
            ProviderError::ServerError(m) if m == "busy"
        ));
        assert!(matches!(
            ProviderError::from_http_status(418, "teapot"),
            ProviderError::Unknown(m) if m == "HTTP 418: teapot"
        ));
        assert_eq!(
            ProviderError::from_http_status(401, r#"{"error":{"message":"bad key"}}"#),
            ProviderError::Authentication("bad key".to_string())
        );
    }

    #[test]
    fn test_foundation_conversion() {
        let err: FoundationError = ProviderError::Network("refused".to_string()).into();
        assert!(err.is_retryable());

        let err: FoundationError = ProviderError::ServerError("down".to_string()).into();
        assert_eq!(err.to_string(), "Provider error: Server error: down");

        let err: FoundationError = ProviderError::Authentication("bad key".to_string()).into();
        assert!(matches!(err, FoundationError::Config(_)));
        assert!(!err.is_retryable());
    }
}
