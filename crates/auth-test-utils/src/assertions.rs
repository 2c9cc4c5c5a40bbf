//! Custom test assertions for expressive tests
//!
//! Decodes token segments without verifying the signature; pair these with
//! a real `verify` when the signature matters.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    sub: String,
    iss: String,
    aud: String,
    iat: i64,
    nbf: i64,
    exp: i64,
    jti: String,
}

fn decode_segment<T: for<'de> Deserialize<'de>>(token: &str, index: usize) -> T {
    let parts: Vec<_> = token.split('.').collect();
    assert_eq!(
        parts.len(),
        3,
        "JWT must have 3 parts (header.payload.signature), got {}",
        parts.len()
    );
    let bytes = URL_SAFE_NO_PAD
        .decode(parts[index])
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT segment {index}: {e}"));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT segment {index}: {e}"))
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_principal("alice")
///     .assert_for_audience("wrapups")
///     .assert_expires_in(3600);
/// ```
pub trait TokenAssertions {
    /// Assert EdDSA/JWT header and a complete claim set
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert the `sub` claim
    fn assert_for_principal(&self, principal: &str) -> &Self;

    /// Assert the `aud` claim
    fn assert_for_audience(&self, audience: &str) -> &Self;

    /// Assert the `iss` claim
    fn assert_issued_by(&self, issuer: &str) -> &Self;

    /// Assert `exp - iat` equals `seconds` and `nbf` precedes `iat`
    fn assert_expires_in(&self, seconds: i64) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let header: JwtHeader = decode_segment(self, 0);
        assert_eq!(header.alg, "EdDSA", "Expected EdDSA algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let claims: JwtClaims = decode_segment(self, 1);
        assert!(!claims.sub.is_empty(), "sub must not be empty");
        assert!(!claims.jti.is_empty(), "jti must not be empty");
        self
    }

    fn assert_for_principal(&self, principal: &str) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1);
        assert_eq!(claims.sub, principal, "Token subject mismatch");
        self
    }

    fn assert_for_audience(&self, audience: &str) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1);
        assert_eq!(claims.aud, audience, "Token audience mismatch");
        self
    }

    fn assert_issued_by(&self, issuer: &str) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1);
        assert_eq!(claims.iss, issuer, "Token issuer mismatch");
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Token lifetime mismatch"
        );
        assert!(claims.nbf <= claims.iat, "nbf must not be after iat");
        self
    }
}
