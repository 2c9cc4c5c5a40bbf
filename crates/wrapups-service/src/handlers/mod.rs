//! HTTP request handlers for the wrapups service.

pub mod health;
pub mod me;
pub mod metrics;
pub mod wrapups;

pub use health::health_check;
pub use me::get_me;
pub use metrics::metrics_handler;
pub use wrapups::{create_wrapup, get_wrapup, list_wrapups};
