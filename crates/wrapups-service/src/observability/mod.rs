//! Observability for the wrapups service.

pub mod metrics;

pub use metrics::init_metrics_recorder;
