//! Issuer error types.
//!
//! Client-facing messages are generic. The `String` payloads are logged
//! server-side and never rendered into a response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Issuer error type.
///
/// Maps to HTTP status codes:
/// - InvalidArgument: 400 Bad Request
/// - AuthenticationFailed: 401 Unauthorized
/// - UpstreamUnavailable: 503 Service Unavailable
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidArgument(_) => 400,
            AuthError::AuthenticationFailed => 401,
            AuthError::UpstreamUnavailable(_) => 503,
            AuthError::Internal(_) => 500,
        }
    }

    /// Bounded `error_category` label for metrics.
    pub fn category(&self) -> &'static str {
        match self {
            AuthError::InvalidArgument(_) => "invalid_argument",
            AuthError::AuthenticationFailed => "authentication",
            AuthError::UpstreamUnavailable(_) => "upstream",
            AuthError::Internal(_) => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::InvalidArgument(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", reason.clone())
            }
            AuthError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            AuthError::UpstreamUnavailable(reason) => {
                tracing::warn!(target: "auth.availability", reason = %reason, "Credential store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            AuthError::Internal(reason) => {
                tracing::error!(target: "auth.internal", reason = %reason, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
