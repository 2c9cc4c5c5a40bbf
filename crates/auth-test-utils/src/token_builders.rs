//! Builder patterns for test claim sets
//!
//! Provides a fluent API for forging tokens the issuer would never mint
//! (expired, not yet valid, foreign audience).

use crate::test_ids::{TEST_AUDIENCE, TEST_ISSUER, TEST_PRINCIPAL_ALICE};
use chrono::Utc;
use common::jwt::{sign, Claims, SigningKey, NOT_BEFORE_SKEW_SECONDS, TOKEN_VALIDITY_SECONDS};
use uuid::Uuid;

/// Builder for test claim sets
///
/// # Example
/// ```rust,ignore
/// let token = TestClaimsBuilder::new()
///     .for_principal("alice")
///     .expired()
///     .sign_with(&keys.signing_key);
/// ```
pub struct TestClaimsBuilder {
    claims: Claims,
}

impl TestClaimsBuilder {
    /// Claims as the issuer would mint them right now
    pub fn new() -> Self {
        let now = Utc::now().timestamp();
        Self {
            claims: Claims {
                sub: TEST_PRINCIPAL_ALICE.to_string(),
                iss: TEST_ISSUER.to_string(),
                aud: TEST_AUDIENCE.to_string(),
                iat: now,
                nbf: now - NOT_BEFORE_SKEW_SECONDS,
                exp: now + TOKEN_VALIDITY_SECONDS,
                jti: Uuid::new_v4().to_string(),
            },
        }
    }

    /// Set the principal (`sub`)
    pub fn for_principal(mut self, principal: &str) -> Self {
        self.claims.sub = principal.to_string();
        self
    }

    /// Set the audience (`aud`)
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.claims.aud = audience.to_string();
        self
    }

    /// Set the issuer (`iss`)
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.claims.iss = issuer.to_string();
        self
    }

    /// Set expiration in seconds from now
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.claims.exp = Utc::now().timestamp() + seconds;
        self
    }

    /// Issued two hours ago, expired one hour ago
    pub fn expired(mut self) -> Self {
        let now = Utc::now().timestamp();
        self.claims.iat = now - 2 * TOKEN_VALIDITY_SECONDS;
        self.claims.nbf = self.claims.iat - NOT_BEFORE_SKEW_SECONDS;
        self.claims.exp = now - TOKEN_VALIDITY_SECONDS;
        self
    }

    /// `nbf` ten minutes in the future
    pub fn not_yet_valid(mut self) -> Self {
        let now = Utc::now().timestamp();
        self.claims.nbf = now + 600;
        self.claims.iat = now + 600;
        self.claims.exp = now + 600 + TOKEN_VALIDITY_SECONDS;
        self
    }

    /// Build the claim set
    pub fn build(self) -> Claims {
        self.claims
    }

    /// Build and sign with `key`
    pub fn sign_with(self, key: &SigningKey) -> String {
        sign(&self.claims, key).expect("test token signing should succeed")
    }
}

impl Default for TestClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
