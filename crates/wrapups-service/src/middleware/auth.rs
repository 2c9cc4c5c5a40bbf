//! Request authenticator for protected routes.
//!
//! Extracts the bearer token, validates it with the configured
//! `TokenValidator`, and injects the `AuthenticatedPrincipal` into request
//! extensions. Requests that fail never reach the handler.

use crate::errors::WuError;
use crate::observability::metrics::record_auth_check;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::IntoResponse,
};
use common::types::Principal;
use common::validator::{TokenValidator, ValidationError};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Client-facing message for a missing or unparseable header.
pub const MALFORMED_HEADER_MESSAGE: &str = "missing or malformed authorization header";

/// Client-facing message for a token the validator refused.
pub const INVALID_TOKEN_MESSAGE: &str = "invalid or expired token";

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn TokenValidator>,
}

/// The principal a request was authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal(pub Principal);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedPrincipal {
    type Rejection = WuError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!(
                    target: "wu.middleware.auth",
                    "No authenticated principal on request; route is missing require_auth"
                );
                WuError::Unauthenticated(MALFORMED_HEADER_MESSAGE.to_string())
            })
    }
}

/// Extract the bearer token from the Authorization header.
///
/// The scheme is matched case-insensitively.
fn extract_bearer_token(req: &Request) -> Result<&str, WuError> {
    let malformed = || WuError::Unauthenticated(MALFORMED_HEADER_MESSAGE.to_string());

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "wu.middleware.auth", "Missing Authorization header");
            malformed()
        })?;

    let (scheme, token) = auth_header.trim().split_once(' ').ok_or_else(|| {
        tracing::debug!(target: "wu.middleware.auth", "Invalid Authorization header format");
        malformed()
    })?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        tracing::debug!(target: "wu.middleware.auth", "Unsupported Authorization scheme");
        return Err(malformed());
    }

    let token = token.trim();
    if token.is_empty() {
        tracing::debug!(target: "wu.middleware.auth", "Empty bearer token");
        return Err(malformed());
    }

    Ok(token)
}

/// Authentication middleware.
///
/// # Response
///
/// - 401 if the header is missing or malformed, or the token is refused
/// - 503 if the validator cannot determine validity
/// - Otherwise continues with `AuthenticatedPrincipal` in extensions
#[instrument(skip_all, name = "wu.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, WuError> {
    let strategy = state.validator.strategy();

    let token = match extract_bearer_token(&req) {
        Ok(token) => token,
        Err(e) => {
            record_auth_check(strategy, "malformed_header", std::time::Duration::ZERO);
            return Err(e);
        }
    };

    let start = Instant::now();
    let result = state.validator.validate(token).await;
    let elapsed = start.elapsed();

    let principal = match result {
        Ok(principal) => {
            record_auth_check(strategy, "success", elapsed);
            principal
        }
        Err(e) => {
            record_auth_check(strategy, e.outcome(), elapsed);
            return Err(match e {
                ValidationError::Unauthenticated(reason) => {
                    tracing::debug!(target: "wu.middleware.auth", strategy, reason = %reason, "Token refused");
                    WuError::Unauthenticated(INVALID_TOKEN_MESSAGE.to_string())
                }
                ValidationError::UpstreamUnavailable(reason) => {
                    WuError::ServiceUnavailable(format!("{strategy} validation: {reason}"))
                }
            });
        }
    };

    req.extensions_mut().insert(AuthenticatedPrincipal(principal));

    Ok(next.run(req).await)
}
