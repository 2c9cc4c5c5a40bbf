//! Wrapups service library.
//!
//! Stores meeting wrap-up notes behind bearer-token authentication.
//!
//! # Modules
//!
//! - `config` - Service configuration and validator selection
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Request authenticator
//! - `repositories` - Wrap-up storage
//! - `routes` - Router assembly and application state

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod repositories;
pub mod routes;
