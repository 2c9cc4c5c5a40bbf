//! Client side of the Wrapups system.
//!
//! Holds the caller's credential and cached token under `~/.wrapups/`,
//! obtains tokens from the issuer on demand, and calls the wrapups service
//! with them.
//!
//! # Modules
//!
//! - `profile` - Location and permissions of the profile directory
//! - `credential` - The `credential` file
//! - `config` - The `config` file (endpoint URLs, audience)
//! - `issuer_client` - HTTP client for the issuer's token endpoint
//! - `token_cache` - Load-or-issue over the `token` file
//! - `client` - Authenticated wrapups API client
//! - `errors` - Error types

pub mod client;
pub mod config;
pub mod credential;
pub mod errors;
pub mod issuer_client;
pub mod profile;
pub mod token_cache;

pub use client::WrapupsClient;
pub use config::ClientConfig;
pub use credential::Credential;
pub use errors::{CacheError, ClientError};
pub use issuer_client::{HttpIssuerClient, TokenIssuerClient};
pub use profile::Profile;
pub use token_cache::{AccessToken, TokenCache, TokenSource};
