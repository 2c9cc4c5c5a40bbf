//! HTTP routes for the wrapups service.

use crate::handlers;
use crate::middleware::{http_metrics_middleware, require_auth, AuthState};
use crate::repositories::WrapupStore;
use axum::{middleware, routing::get, Router};
use common::validator::TokenValidator;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WrapupStore>,
    pub validator: Arc<dyn TokenValidator>,
}

/// Build the application routes.
///
/// - `/health`, `/metrics` - public
/// - `/api/v1/me`, `/api/v1/wrapups`, `/api/v1/wrapups/:id` - behind `require_auth`
/// - TraceLayer, 30 second timeout, HTTP metrics (outermost)
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        validator: state.validator.clone(),
    });

    let public_routes = Router::new().route("/health", get(handlers::health_check));

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let protected_routes = Router::new()
        .route("/api/v1/me", get(handlers::get_me))
        .route(
            "/api/v1/wrapups",
            get(handlers::list_wrapups).post(handlers::create_wrapup),
        )
        .route("/api/v1/wrapups/:id", get(handlers::get_wrapup))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
