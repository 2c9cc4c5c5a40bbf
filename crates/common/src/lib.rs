//! Token codec, validators and shared types for the Wrapups services.

#![warn(clippy::pedantic)]

/// Module for request/response and domain types shared over HTTP
pub mod types;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for the token codec (claims, key material, sign/verify)
pub mod jwt;

/// Module for token validation strategies (local and delegated)
pub mod validator;

/// Module for tracing subscriber setup
pub mod observability;
