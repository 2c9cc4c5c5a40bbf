//! Token issuance: bind the credential, then sign a claim set.

use crate::credentials::{BindError, CredentialStore};
use crate::errors::AuthError;
use crate::observability::metrics::{record_credential_bind, record_token_issuance};
use chrono::Utc;
use common::jwt::{sign, Claims, SigningKey};
use common::secret::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// A freshly signed token together with the claims it carries.
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

impl IssuedToken {
    /// Seconds between issuance and expiry.
    pub fn expires_in(&self) -> u64 {
        u64::try_from(self.claims.exp - self.claims.iat).unwrap_or(0)
    }
}

/// Issues tokens for principals that pass a credential bind.
///
/// The signing key is loaded once at startup and injected here; a key
/// problem never surfaces per call.
pub struct TokenIssuer {
    credentials: Arc<dyn CredentialStore>,
    signing_key: Arc<SigningKey>,
    issuer: String,
}

impl TokenIssuer {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        signing_key: Arc<SigningKey>,
        issuer: String,
    ) -> Self {
        Self {
            credentials,
            signing_key,
            issuer,
        }
    }

    /// Issue a token for `principal`, bound for `audience`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if any input is empty
    /// - `AuthenticationFailed` if the credential store rejects the bind
    /// - `UpstreamUnavailable` if the credential store cannot answer
    /// - `Internal` if signing fails
    #[instrument(skip_all)]
    pub async fn issue_token(
        &self,
        principal: &str,
        secret: &SecretString,
        audience: &str,
    ) -> Result<IssuedToken, AuthError> {
        let start = Instant::now();
        let result = self.issue(principal, secret, audience).await;

        match &result {
            Ok(_) => record_token_issuance("success", None, start.elapsed()),
            Err(e) => record_token_issuance("error", Some(e.category()), start.elapsed()),
        }

        result
    }

    async fn issue(
        &self,
        principal: &str,
        secret: &SecretString,
        audience: &str,
    ) -> Result<IssuedToken, AuthError> {
        if principal.trim().is_empty() {
            return Err(AuthError::InvalidArgument("principal is required".to_string()));
        }
        if secret.expose_secret().is_empty() {
            return Err(AuthError::InvalidArgument("secret is required".to_string()));
        }
        if audience.trim().is_empty() {
            return Err(AuthError::InvalidArgument("audience is required".to_string()));
        }

        match self.credentials.bind(principal, secret).await {
            Ok(()) => record_credential_bind("success"),
            Err(BindError::Rejected) => {
                record_credential_bind("rejected");
                tracing::debug!(target: "auth.token", "Credential bind rejected");
                return Err(AuthError::AuthenticationFailed);
            }
            Err(BindError::Unavailable(reason)) => {
                record_credential_bind("unavailable");
                return Err(AuthError::UpstreamUnavailable(reason));
            }
        }

        let claims = Claims::new(principal, &self.issuer, audience, Utc::now().timestamp());
        let token = sign(&claims, &self.signing_key)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(
            target: "auth.token",
            audience = %claims.aud,
            exp = claims.exp,
            "Token issued"
        );

        Ok(IssuedToken { token, claims })
    }
}
