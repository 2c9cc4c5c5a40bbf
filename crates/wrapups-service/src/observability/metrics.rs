//! Metrics definitions for the wrapups service.
//!
//! All metrics use the `wu_` prefix.
//!
//! # Cardinality
//!
//! - `strategy`: local, delegated
//! - `outcome`: success, malformed_header, unauthenticated, upstream_unavailable
//! - `operation`: list, get, create
//! - `endpoint`: normalized, unknown paths collapse to `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder.
///
/// # Errors
///
/// Fails if bucket configuration is invalid or a recorder is already
/// installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Local checks are sub-millisecond; delegated ones are a network round trip
        .set_buckets_for_metric(
            Matcher::Full("wu_auth_check_duration_seconds".to_string()),
            &[
                0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set auth check buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("wu_http_request".to_string()),
            &[0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.500, 1.000, 2.000],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}

/// Record an authenticator decision.
///
/// Metric: `wu_auth_checks_total`, `wu_auth_check_duration_seconds`
/// Labels: `strategy`, `outcome`
pub fn record_auth_check(strategy: &str, outcome: &str, duration: Duration) {
    histogram!("wu_auth_check_duration_seconds",
        "strategy" => strategy.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("wu_auth_checks_total",
        "strategy" => strategy.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a wrap-up store operation.
///
/// Metric: `wu_wrapup_operations_total`
/// Labels: `operation`, `status`
pub fn record_wrapup_operation(operation: &str, status: &str) {
    counter!("wu_wrapup_operations_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request completion.
///
/// Metric: `wu_http_requests_total`, `wu_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_endpoint(path);

    histogram!("wu_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status" => categorize_status_code(status_code)
    )
    .record(duration.as_secs_f64());

    counter!("wu_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/api/v1/me" => "/api/v1/me",
        "/api/v1/wrapups" => "/api/v1/wrapups",
        _ => match path.strip_prefix("/api/v1/wrapups/") {
            Some(id) if !id.is_empty() && !id.contains('/') => "/api/v1/wrapups/{id}",
            _ => "/other",
        },
    }
}
