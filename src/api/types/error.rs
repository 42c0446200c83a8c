//! API error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Machine-readable error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    NotFoundError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// JSON error envelope returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    /// Add a stable error code (e.g. "ORGANIZATIONS_DISABLED")
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorType::InvalidRequestError,
            message,
        )
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ApiErrorType::AuthenticationError,
            message,
        )
    }

    /// Not found error (only used for unmatched routes)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }

    /// The disabled-feature rejection shared by every hierarchy endpoint
    pub fn organizations_disabled() -> Self {
        Self::bad_request("Organizations are disabled").with_code("ORGANIZATIONS_DISABLED")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidId { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::bad_request(message),
            // Persistence misses surface as 500 with the lookup message
            DomainError::NotFound { message } => {
                Self::internal(message).with_code("not_found")
            }
            DomainError::Storage { .. } | DomainError::Internal { .. } => {
                error!(error = %err, "Internal failure while handling request");
                Self::internal("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Missing name");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.response.error.error_type,
            ApiErrorType::InvalidRequestError
        );
        assert_eq!(err.response.error.message, "Missing name");
    }

    #[test]
    fn test_api_error_with_code() {
        let err = ApiError::unauthorized("Role required").with_code("DEPARTMENT_USER_REQUIRED");

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.response.error.code,
            Some("DEPARTMENT_USER_REQUIRED".to_string())
        );
    }

    #[test]
    fn test_organizations_disabled() {
        let err = ApiError::organizations_disabled();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.response.error.code,
            Some("ORGANIZATIONS_DISABLED".to_string())
        );
    }

    #[test]
    fn test_client_errors_map_to_400() {
        let err: ApiError = DomainError::validation("bad input").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = DomainError::invalid_id("bad id").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = DomainError::conflict("exists").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_persistence_errors_map_to_500() {
        let err: ApiError = DomainError::not_found("User with email 'x' not found").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response.error.code, Some("not_found".to_string()));

        let err: ApiError = DomainError::storage("connection reset").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        // The raw storage error is logged, not surfaced
        assert_eq!(err.response.error.message, "Internal server error");
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unauthorized("Invalid API key");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("authentication_error"));
        assert!(json.contains("Invalid API key"));
    }
}
