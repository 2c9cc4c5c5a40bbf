//! Prometheus scrape endpoint.

use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
