//! Wrapups service error types.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// `WWW-Authenticate` value sent with every 401.
pub const WWW_AUTHENTICATE_VALUE: &str = "Bearer realm=\"wrapups-service\"";

/// Wrapups service error type.
///
/// Maps to HTTP status codes:
/// - BadRequest: 400
/// - Unauthenticated: 401 (with `WWW-Authenticate`)
/// - NotFound: 404
/// - ServiceUnavailable: 503
/// - Internal: 500
#[derive(Debug, Error)]
pub enum WuError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Payload is a client-safe message.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Payload is logged, never returned.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Payload is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WuError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            WuError::BadRequest(_) => 400,
            WuError::Unauthenticated(_) => 401,
            WuError::NotFound(_) => 404,
            WuError::ServiceUnavailable(_) => 503,
            WuError::Internal(_) => 500,
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

impl IntoResponse for WuError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            WuError::BadRequest(reason) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone()),
            WuError::Unauthenticated(message) => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", message.clone())
            }
            WuError::NotFound(reason) => (StatusCode::NOT_FOUND, "NOT_FOUND", reason.clone()),
            WuError::ServiceUnavailable(reason) => {
                tracing::warn!(target: "wu.availability", reason = %reason, "Dependency unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            WuError::Internal(reason) => {
                tracing::error!(target: "wu.internal", reason = %reason, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        let mut response = (status, body).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static(WWW_AUTHENTICATE_VALUE),
            );
        }

        response
    }
}
