//! # Client Error Types
//!
//! Unified error handling for every orchestrator operation.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Error taxonomy for orchestrator client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not authenticated: authenticate the client before calling the orchestrator")]
    NotAuthenticated,

    #[error("Authentication failed: {status} - {message}")]
    AuthError { status: u16, message: String },

    #[error("Server error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("{resource} not found: {name}")]
    NotFound { resource: String, name: String },

    #[error("Invalid response: {field} - {reason}")]
    InvalidResponse { field: String, reason: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ClientError {
    /// Create a server error from an HTTP status and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error from an HTTP status and message
    pub fn auth_error(status: u16, message: impl Into<String>) -> Self {
        Self::AuthError {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a not-found error for a named resource
    pub fn not_found(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Create an invalid response error
    ///
    /// Use this when a success response is missing a required field. The
    /// orchestrator broke its contract, so the call must not default silently.
    pub fn invalid_response(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::AuthError { status, .. } | ClientError::ApiError { status, .. } => {
                Some(*status)
            }
            ClientError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    /// Check if error is recoverable (worth retrying by the caller)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::HttpError(e) => e.is_timeout() || e.is_connect(),
            ClientError::ApiError { status, .. } => *status >= 500,
            // Broken response shapes and auth failures do not fix themselves on retry
            _ => false,
        }
    }
}

/// Pick the most useful message out of an error response body
///
/// The orchestrator reports failures as `{"message": "..."}`; anything else
/// falls back to the raw body, then to the status reason.
pub(crate) fn server_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(serde_json::Value::as_str) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_server_errors_are_recoverable_only_for_5xx() {
        assert!(ClientError::api_error(503, "unavailable").is_recoverable());
        assert!(!ClientError::api_error(400, "bad request").is_recoverable());
        assert!(!ClientError::auth_error(500, "boom").is_recoverable());
        assert!(!ClientError::invalid_response("value", "missing").is_recoverable());
    }

    #[test]
    fn test_status_extraction() {
        assert_eq!(ClientError::api_error(409, "conflict").status(), Some(409));
        assert_eq!(ClientError::auth_error(401, "nope").status(), Some(401));
        assert_eq!(ClientError::NotAuthenticated.status(), None);
    }

    #[test]
    fn test_display_messages() {
        let err = ClientError::not_found("Release", "Invoices");
        assert_eq!(err.to_string(), "Release not found: Invoices");
        assert!(err.is_not_found());

        let err = ClientError::api_error(400, "Queue does not exist.");
        assert_eq!(err.to_string(), "Server error: 400 - Queue does not exist.");
    }

    #[test]
    fn test_server_message_prefers_message_field() {
        let body = r#"{"message":"Queue does not exist.","errorCode":1002}"#;
        assert_eq!(
            server_message(StatusCode::BAD_REQUEST, body),
            "Queue does not exist."
        );
    }

    #[test]
    fn test_server_message_fallbacks() {
        assert_eq!(
            server_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(server_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(
            server_message(StatusCode::FORBIDDEN, r#"{"error":"nope"}"#),
            r#"{"error":"nope"}"#
        );
    }
}
