//! SDK error types and handling
//!
//! This module maps transport failures and error responses from the data
//! service onto [`SdkError`], and from there onto the wizard's
//! [`ServiceError`], keeping any message the service supplied.

use prompt_batch_core::ServiceError;
use serde::Deserialize;
use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        error_code: Option<String>,
        request_id: Option<String>,
    },

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Authorization failed
    #[error("Access denied: {0}")]
    AuthorizationError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request rejected by the service, or by local validation before sending
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Server error
    #[error("Server error: {0}")]
    ServerError(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Reported for a 401 whose body carries no message.
pub const UNAUTHENTICATED_MESSAGE: &str =
    "Authentication failed: the data service rejected the configured credentials";

/// Reported for a 403 whose body carries no message.
pub const FORBIDDEN_MESSAGE: &str =
    "Access denied: the configured credentials may not use this data service operation";

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Error body returned by the data service.
///
/// Handlers answer with either a single object or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorResponse {
    Single(ApiErrorBody),
    List(Vec<ApiErrorBody>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "error")]
    pub error_code: Option<String>,
}

impl ApiErrorResponse {
    fn into_first(self) -> Option<ApiErrorBody> {
        match self {
            ApiErrorResponse::Single(body) => Some(body),
            ApiErrorResponse::List(bodies) => bodies.into_iter().next(),
        }
    }
}

impl SdkError {
    /// Create an API error from a response
    pub fn from_response(status: u16, body: &str, request_id: Option<String>) -> Self {
        let parsed = serde_json::from_str::<ApiErrorResponse>(body)
            .ok()
            .and_then(ApiErrorResponse::into_first);

        let (message, error_code) = match parsed {
            Some(ApiErrorBody {
                message,
                error_code,
            }) => (message.unwrap_or_default(), error_code),
            None => (body.trim().to_string(), None),
        };

        match status {
            401 => SdkError::AuthenticationError(message),
            403 => SdkError::AuthorizationError(message),
            404 => SdkError::NotFound(message),
            422 => SdkError::ValidationError(message),
            429 => SdkError::RateLimited { retry_after: 60 },
            500..=599 => SdkError::ServerError(message),
            _ => SdkError::ApiError {
                status,
                message,
                error_code,
                request_id,
            },
        }
    }

    /// Whether the client's retry loop may try the request again
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::NetworkError(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            SdkError::Timeout(_) | SdkError::RateLimited { .. } | SdkError::ServerError(_) => {
                true
            }
            _ => false,
        }
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            SdkError::RateLimited { .. } => Some(429),
            SdkError::AuthenticationError(_) => Some(401),
            SdkError::AuthorizationError(_) => Some(403),
            SdkError::NotFound(_) => Some(404),
            SdkError::ValidationError(_) => Some(422),
            SdkError::ServerError(_) => Some(500),
            _ => None,
        }
    }

    /// Get the request ID if available
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SdkError::ApiError { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// The message the service itself supplied, if any.
    pub fn service_message(&self) -> Option<&str> {
        let message = match self {
            SdkError::ApiError { message, .. }
            | SdkError::AuthenticationError(message)
            | SdkError::AuthorizationError(message)
            | SdkError::NotFound(message)
            | SdkError::ValidationError(message)
            | SdkError::ServerError(message) => message.as_str(),
            _ => return None,
        };
        Some(message).filter(|m| !m.trim().is_empty())
    }
}

impl From<SdkError> for ServiceError {
    fn from(err: SdkError) -> Self {
        if let Some(message) = err.service_message() {
            return ServiceError::new(message);
        }
        match &err {
            SdkError::AuthenticationError(_) => ServiceError::new(UNAUTHENTICATED_MESSAGE),
            SdkError::AuthorizationError(_) => ServiceError::new(FORBIDDEN_MESSAGE),
            SdkError::NetworkError(_)
            | SdkError::Timeout(_)
            | SdkError::RateLimited { .. }
            | SdkError::SerializationError(_) => ServiceError::new(err.to_string()),
            _ => ServiceError::without_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_json_response() {
        let body = r#"{"message": "Template not found", "errorCode": "NOT_FOUND"}"#;
        let error = SdkError::from_response(404, body, Some("req-123".to_string()));

        assert!(matches!(error, SdkError::NotFound(_)));
        assert_eq!(error.service_message(), Some("Template not found"));
    }

    #[test]
    fn test_error_from_list_response() {
        let body = r#"[{"message": "Invalid retriever", "errorCode": "FIELD_INTEGRITY_EXCEPTION"}]"#;
        let error = SdkError::from_response(400, body, None);

        match error {
            SdkError::ApiError {
                status,
                message,
                error_code,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid retriever");
                assert_eq!(error_code.as_deref(), Some("FIELD_INTEGRITY_EXCEPTION"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(SdkError::RateLimited { retry_after: 60 }.is_retryable());
        assert!(SdkError::Timeout(30).is_retryable());
        assert!(SdkError::from_response(502, "", None).is_retryable());
        assert!(!SdkError::NotFound("batch".to_string()).is_retryable());
        assert!(!SdkError::from_response(401, "", None).is_retryable());
        assert!(!SdkError::ValidationError("no records".to_string()).is_retryable());
    }

    #[test]
    fn test_error_status_code() {
        let api_error = SdkError::ApiError {
            status: 400,
            message: "Bad request".to_string(),
            error_code: None,
            request_id: None,
        };
        assert_eq!(api_error.status_code(), Some(400));

        let auth_error = SdkError::AuthenticationError("Invalid token".to_string());
        assert_eq!(auth_error.status_code(), Some(401));
    }

    #[test]
    fn test_service_error_keeps_message_verbatim() {
        let error = SdkError::from_response(500, r#"{"message": "Apex CPU time limit exceeded"}"#, None);
        let service: ServiceError = error.into();
        assert_eq!(service.message.as_deref(), Some("Apex CPU time limit exceeded"));
    }

    #[test]
    fn test_service_error_without_body_is_generic() {
        let error = SdkError::from_response(500, "", None);
        let service: ServiceError = error.into();
        assert_eq!(service.message, None);
    }

    #[test]
    fn test_auth_failures_without_body_keep_their_context() {
        let service: ServiceError = SdkError::from_response(401, "", None).into();
        assert_eq!(service.message.as_deref(), Some(UNAUTHENTICATED_MESSAGE));

        let service: ServiceError = SdkError::from_response(403, "  ", None).into();
        assert_eq!(service.message.as_deref(), Some(FORBIDDEN_MESSAGE));
    }

    #[test]
    fn test_auth_failure_prefers_service_message() {
        let body = r#"[{"message": "Session expired or invalid", "errorCode": "INVALID_SESSION_ID"}]"#;
        let service: ServiceError = SdkError::from_response(401, body, None).into();
        assert_eq!(service.message.as_deref(), Some("Session expired or invalid"));
    }
}
