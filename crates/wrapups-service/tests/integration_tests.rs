//! Integration tests for the wrapups service
//!
//! Cargo discovers this harness; test modules live in integration/.

#[path = "integration/auth_tests.rs"]
mod auth_tests;

#[path = "integration/delegated_validation_tests.rs"]
mod delegated_validation_tests;

#[path = "integration/wrapups_api_tests.rs"]
mod wrapups_api_tests;
