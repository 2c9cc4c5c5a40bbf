//! Current principal endpoint.

use crate::middleware::AuthenticatedPrincipal;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub principal: String,
}

/// `GET /api/v1/me`: who the bearer token was issued to.
pub async fn get_me(AuthenticatedPrincipal(principal): AuthenticatedPrincipal) -> Json<MeResponse> {
    Json(MeResponse {
        principal: principal.as_str().to_string(),
    })
}
