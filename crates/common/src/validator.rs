//! Token validation strategies.
//!
//! A verifying service picks exactly one strategy at startup:
//!
//! - [`LocalValidator`] verifies the signature in-process with the issuer's
//!   public key. No network round trip per request.
//! - [`DelegatedValidator`] forwards the token to the issuer's
//!   `POST /api/v1/auth/validate` endpoint and trusts its answer. The
//!   issuer checks signature and expiry only, so a token minted for any
//!   audience passes; [`TokenValidator::checks_audience`] reports this.
//!
//! Both return the same two-way failure taxonomy so the request
//! authenticator maps them identically: `Unauthenticated` is a client
//! problem (401), `UpstreamUnavailable` is an infrastructure problem (503).

use crate::jwt::{
    verify_at, ClaimExpectations, Claims, CodecError, VerifyingKey, MAX_JWT_SIZE_BYTES,
};
use crate::types::{Principal, ValidateTokenRequest, ValidateTokenResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

/// Connect timeout for the delegated strategy.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Path of the issuer's validation endpoint.
pub const VALIDATE_PATH: &str = "/api/v1/auth/validate";

/// Validation failure.
///
/// The `String` payloads are for server-side logs only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The token is not acceptable.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Validity could not be determined.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl ValidationError {
    /// Bounded label for metrics.
    #[must_use]
    pub fn outcome(&self) -> &'static str {
        match self {
            ValidationError::Unauthenticated(_) => "unauthenticated",
            ValidationError::UpstreamUnavailable(_) => "upstream_unavailable",
        }
    }
}

/// Validates a bearer token and returns the principal it was issued to.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate `token`.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` when the token is invalid, expired or malformed
    /// - `UpstreamUnavailable` when validity cannot be determined
    async fn validate(&self, token: &str) -> Result<Principal, ValidationError>;

    /// Strategy name for metrics and logs.
    fn strategy(&self) -> &'static str;

    /// Whether `aud` is compared against this service's audience.
    fn checks_audience(&self) -> bool {
        true
    }
}

// =============================================================================
// Local
// =============================================================================

/// Verifies tokens in-process against the issuer's public key.
#[derive(Debug, Clone)]
pub struct LocalValidator {
    key: Arc<VerifyingKey>,
    expectations: ClaimExpectations,
}

impl LocalValidator {
    #[must_use]
    pub fn new(key: Arc<VerifyingKey>, expectations: ClaimExpectations) -> Self {
        Self { key, expectations }
    }

    /// Verify against the wall clock and return the full claim set.
    ///
    /// # Errors
    ///
    /// Returns the codec error unchanged, for callers that label by category.
    pub fn verify_claims(&self, token: &str) -> Result<Claims, CodecError> {
        verify_at(
            token,
            &self.key,
            &self.expectations,
            chrono::Utc::now().timestamp(),
        )
    }
}

#[async_trait]
impl TokenValidator for LocalValidator {
    #[instrument(skip_all, fields(strategy = "local"))]
    async fn validate(&self, token: &str) -> Result<Principal, ValidationError> {
        let claims = self.verify_claims(token).map_err(|e| {
            tracing::debug!(
                target: "common.validator",
                error = %e,
                category = e.category(),
                "Local token validation failed"
            );
            ValidationError::Unauthenticated(e.to_string())
        })?;

        Ok(Principal::new(claims.sub))
    }

    fn strategy(&self) -> &'static str {
        "local"
    }
}

// =============================================================================
// Delegated
// =============================================================================

/// Forwards each token to the issuer's validation endpoint.
#[derive(Debug, Clone)]
pub struct DelegatedValidator {
    client: Client,
    validate_url: String,
}

impl DelegatedValidator {
    /// Build a validator posting to `validate_url`.
    ///
    /// `timeout` bounds the whole round trip; exceeding it yields
    /// `UpstreamUnavailable`.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the HTTP client cannot be built.
    pub fn new(validate_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .build()?;

        Ok(Self {
            client,
            validate_url,
        })
    }

    /// Build a validator for an issuer base URL (e.g. `http://auth:10000`).
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the HTTP client cannot be built.
    pub fn for_issuer(issuer_base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let url = format!("{}{}", issuer_base_url.trim_end_matches('/'), VALIDATE_PATH);
        Self::new(url, timeout)
    }
}

#[async_trait]
impl TokenValidator for DelegatedValidator {
    #[instrument(skip_all, fields(strategy = "delegated"))]
    async fn validate(&self, token: &str) -> Result<Principal, ValidationError> {
        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "common.validator",
                token_size = token.len(),
                "Token rejected locally: size exceeds maximum allowed"
            );
            return Err(ValidationError::Unauthenticated(
                "token exceeds maximum size".to_string(),
            ));
        }

        let body = ValidateTokenRequest {
            token: token.to_string(),
        };

        let response = self
            .client
            .post(&self.validate_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target: "common.validator", error = %e, "Validation request failed");
                ValidationError::UpstreamUnavailable(format!("validation request failed: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            let parsed: ValidateTokenResponse = response.json().await.map_err(|e| {
                tracing::warn!(target: "common.validator", error = %e, "Failed to parse validation response");
                ValidationError::UpstreamUnavailable("unparseable validation response".to_string())
            })?;

            if parsed.valid && !parsed.principal.is_empty() {
                Ok(Principal::new(parsed.principal))
            } else {
                tracing::debug!(target: "common.validator", "Issuer reported token invalid");
                Err(ValidationError::Unauthenticated(
                    "issuer reported token invalid".to_string(),
                ))
            }
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            tracing::debug!(target: "common.validator", status = %status, "Issuer rejected token");
            Err(ValidationError::Unauthenticated(format!(
                "issuer rejected token with status {status}"
            )))
        } else {
            tracing::warn!(target: "common.validator", status = %status, "Unexpected issuer response");
            Err(ValidationError::UpstreamUnavailable(format!(
                "issuer returned status {status}"
            )))
        }
    }

    fn strategy(&self) -> &'static str {
        "delegated"
    }

    fn checks_audience(&self) -> bool {
        false
    }
}
