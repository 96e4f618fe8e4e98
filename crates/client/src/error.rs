//! Error types for the Postman API client.

use serde::Deserialize;

/// Result type for client operations.
pub type PostmanResult<T> = Result<T, PostmanError>;

/// Error types that can occur when talking to the Postman API.
#[derive(Debug, thiserror::Error)]
pub enum PostmanError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        name: Option<String>,
        message: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl PostmanError {
    /// Build an API error from a status code and response body.
    ///
    /// Prefers the message inside the Postman error envelope
    /// `{"error": {"name": ..., "message": ...}}`; falls back to the raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            Self::Api {
                status,
                name: envelope.error.name,
                message: envelope.error.message,
            }
        } else {
            Self::Api {
                status,
                name: None,
                message: body.to_string(),
            }
        }
    }

    /// The message the API supplied, if this is an API error.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Error envelope returned by the Postman API.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    name: Option<String>,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_postman_envelope() {
        let body = r#"{"error":{"name":"instanceNotFoundError","message":"not found"}}"#;
        match PostmanError::from_response(404, body) {
            PostmanError::Api {
                status,
                name,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(name.as_deref(), Some("instanceNotFoundError"));
                assert_eq!(message, "not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_envelope_without_name() {
        let body = r#"{"error":{"message":"forbidden"}}"#;
        match PostmanError::from_response(403, body) {
            PostmanError::Api { name, message, .. } => {
                assert!(name.is_none());
                assert_eq!(message, "forbidden");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_plain_body() {
        match PostmanError::from_response(500, "Internal Server Error") {
            PostmanError::Api { status, message, .. } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_message() {
        let err = PostmanError::from_response(404, r#"{"error":{"message":"not found"}}"#);
        assert_eq!(err.api_message(), Some("not found"));

        let err = PostmanError::Config("missing key".to_string());
        assert!(err.api_message().is_none());
    }
}
