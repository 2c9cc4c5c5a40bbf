//! Wrapups issuer library.
//!
//! Verifies credentials against the credential store and mints signed
//! access tokens. Also answers delegated validation requests from
//! services that do not hold the public key.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `credentials` - Credential store (bind semantics)
//! - `crypto` - Secret hashing and signing-key bootstrap
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `observability` - Prometheus metrics
//! - `routes` - Router assembly
//! - `services` - Token issuance

pub mod config;
pub mod credentials;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod services;
