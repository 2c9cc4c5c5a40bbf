//! # Auth Test Utilities
//!
//! Shared test utilities for the issuer and the wrapups service.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (seeded Ed25519 keys, credential files)
//! - Claim builders (`TestClaimsBuilder`) for forging edge-case tokens
//! - Server test harnesses (`TestAuthServer`, `TestWrapupsServer`)
//! - Fixed test ids (principals, secrets, audiences)
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let auth = TestAuthServer::spawn().await?;
//!     let token = auth
//!         .issue_token(TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE, TEST_AUDIENCE)
//!         .await?;
//!
//!     token
//!         .assert_valid_jwt()
//!         .assert_for_principal(TEST_PRINCIPAL_ALICE)
//!         .assert_expires_in(3600);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
