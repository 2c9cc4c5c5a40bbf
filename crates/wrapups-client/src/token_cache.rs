//! Client token cache.
//!
//! `load_or_issue` returns the cached token if there is one, otherwise
//! exchanges the stored credential for a new token exactly once and caches
//! it. The cache never inspects or refreshes the token it holds; a caller
//! that sees a cached token refused calls `evict` and asks again. The
//! returned [`AccessToken`] says which of the two paths produced it.

use crate::credential::Credential;
use crate::errors::CacheError;
use crate::issuer_client::TokenIssuerClient;
use crate::profile::{read_optional, Profile};
use common::secret::{ExposeSecret, SecretString};
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::instrument;

/// Where an [`AccessToken`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Read from the `token` file.
    Cache,
    /// Issued during this call.
    Issuer,
}

#[derive(Debug)]
pub struct AccessToken {
    pub secret: SecretString,
    pub source: TokenSource,
}

pub struct TokenCache {
    profile: Profile,
    issuer: Arc<dyn TokenIssuerClient>,
    audience: String,
}

impl TokenCache {
    pub fn new(profile: Profile, issuer: Arc<dyn TokenIssuerClient>, audience: impl Into<String>) -> Self {
        Self {
            profile,
            issuer,
            audience: audience.into(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Cached token, or a newly issued one.
    ///
    /// An empty token file counts as no token.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if there is neither a token nor a credential file
    /// - `InvalidCredential` if the credential file is malformed
    /// - `AuthenticationFailed` / `UpstreamUnavailable` from the issuer;
    ///   nothing is written in that case
    /// - `Io` if the profile cannot be read or written
    #[instrument(skip_all)]
    pub async fn load_or_issue(&self) -> Result<AccessToken, CacheError> {
        let token_path = self.profile.token_path();

        if let Some(cached) = read_optional(&token_path).await? {
            let cached = cached.trim();
            if !cached.is_empty() {
                tracing::debug!(target: "client.token_cache", "Using cached token");
                return Ok(AccessToken {
                    secret: SecretString::from(cached),
                    source: TokenSource::Cache,
                });
            }
        }

        let credential = Credential::load(&self.profile)
            .await?
            .ok_or(CacheError::NotConfigured)?;

        let token = self.issuer.issue(&credential, &self.audience).await?;
        drop(credential);

        self.profile
            .write_private(&token_path, token.expose_secret().as_bytes())
            .await?;

        tracing::info!(target: "client.token_cache", audience = %self.audience, "Issued and cached new token");

        Ok(AccessToken {
            secret: token,
            source: TokenSource::Issuer,
        })
    }

    /// Remove the cached token. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// `Io` if the file exists but cannot be removed.
    #[instrument(skip_all)]
    pub async fn evict(&self) -> Result<(), CacheError> {
        let token_path = self.profile.token_path();
        match tokio::fs::remove_file(&token_path).await {
            Ok(()) => {
                tracing::debug!(target: "client.token_cache", "Evicted cached token");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io(token_path, e)),
        }
    }
}
