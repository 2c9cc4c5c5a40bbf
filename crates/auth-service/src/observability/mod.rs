//! Observability for the issuer.
//!
//! Instrumented functions use `#[instrument(skip_all)]`. Principals,
//! secrets and tokens never appear as span fields or metric labels.

pub mod metrics;

pub use metrics::{
    init_metrics_recorder, record_credential_bind, record_token_issuance, record_token_validation,
};
