//! HTTP request handlers for the issuer.

pub mod auth_handler;

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

pub use auth_handler::{handle_issue_token, handle_validate_token, AppState};

/// Liveness probe. Does not check dependencies.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Handler for GET /metrics
///
/// Unauthenticated. Labels carry no principals or tokens.
#[tracing::instrument(skip_all, name = "auth.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
