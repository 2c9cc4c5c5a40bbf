use crate::errors::AuthError;
use crate::observability::metrics::record_token_validation;
use crate::services::TokenIssuer;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use common::types::{
    IssueTokenRequest, IssueTokenResponse, ValidateTokenRequest, ValidateTokenResponse,
};
use common::validator::LocalValidator;
use std::sync::Arc;
use tracing::instrument;

/// Client-facing message for a body that is not the expected JSON shape.
pub const INVALID_BODY_MESSAGE: &str = "request body is malformed or incomplete";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    /// Verifies tokens against this issuer's own public key.
    pub validator: Arc<LocalValidator>,
}

/// Token issuance endpoint
/// POST /api/v1/auth/token
///
/// Binds `principal`/`secret` against the credential store and returns a
/// signed token for `audience`.
#[instrument(skip_all, name = "auth.handlers.issue_token")]
pub async fn handle_issue_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IssueTokenRequest>, JsonRejection>,
) -> Result<Json<IssueTokenResponse>, AuthError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(target: "auth.handlers", error = %rejection, "Rejected token request body");
        AuthError::InvalidArgument(INVALID_BODY_MESSAGE.to_string())
    })?;

    let issued = state
        .issuer
        .issue_token(&request.principal, &request.secret, &request.audience)
        .await?;

    Ok(Json(IssueTokenResponse {
        expires_in: issued.expires_in(),
        token: issued.token,
    }))
}

/// Delegated validation endpoint
/// POST /api/v1/auth/validate
///
/// Always 200. An unacceptable token, or a body that is not
/// `{"token": "..."}`, yields `{"valid": false, "principal": ""}`.
#[instrument(skip_all, name = "auth.handlers.validate_token")]
pub async fn handle_validate_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ValidateTokenRequest>, JsonRejection>,
) -> Json<ValidateTokenResponse> {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            tracing::debug!(target: "auth.handlers", error = %rejection, "Rejected validation request body");
            record_token_validation("error", Some("malformed"));
            return Json(ValidateTokenResponse {
                valid: false,
                principal: String::new(),
            });
        }
    };

    match state.validator.verify_claims(&request.token) {
        Ok(claims) => {
            record_token_validation("success", None);
            Json(ValidateTokenResponse {
                valid: true,
                principal: claims.sub,
            })
        }
        Err(e) => {
            tracing::debug!(target: "auth.handlers", category = e.category(), "Token failed validation");
            record_token_validation("error", Some(e.category()));
            Json(ValidateTokenResponse {
                valid: false,
                principal: String::new(),
            })
        }
    }
}
