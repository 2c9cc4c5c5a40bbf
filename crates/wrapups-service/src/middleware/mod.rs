//! Middleware for the wrapups service.

pub mod auth;
pub mod http_metrics;

pub use auth::{require_auth, AuthState, AuthenticatedPrincipal};
pub use http_metrics::http_metrics_middleware;
