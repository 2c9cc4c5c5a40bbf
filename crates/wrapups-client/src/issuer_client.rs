//! HTTP client for the issuer's token endpoint.

use crate::credential::Credential;
use crate::errors::CacheError;
use async_trait::async_trait;
use common::secret::SecretString;
use common::types::{IssueTokenRequest, IssueTokenResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::instrument;

pub const TOKEN_PATH: &str = "/api/v1/auth/token";

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Exchanges a credential for a token.
#[async_trait]
pub trait TokenIssuerClient: Send + Sync {
    /// One issuance attempt. Never retries.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailed` if the issuer rejects the credential
    /// - `UpstreamUnavailable` if the issuer cannot be reached or fails
    /// - `InvalidResponse` if a success response cannot be decoded
    async fn issue(&self, credential: &Credential, audience: &str) -> Result<SecretString, CacheError>;
}

#[derive(Debug, Clone)]
pub struct HttpIssuerClient {
    client: Client,
    token_url: String,
}

impl HttpIssuerClient {
    /// Client for an issuer base URL (e.g. `http://auth:10000`).
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the HTTP client cannot be built.
    pub fn new(issuer_base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .build()?;

        Ok(Self {
            client,
            token_url: format!("{}{}", issuer_base_url.trim_end_matches('/'), TOKEN_PATH),
        })
    }
}

#[async_trait]
impl TokenIssuerClient for HttpIssuerClient {
    #[instrument(skip_all)]
    async fn issue(&self, credential: &Credential, audience: &str) -> Result<SecretString, CacheError> {
        let request = IssueTokenRequest {
            principal: credential.principal.clone(),
            secret: credential.secret.clone(),
            audience: audience.to_string(),
        };

        let response = self
            .client
            .post(&self.token_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target: "client.issuer", error = %e, "Token request failed");
                CacheError::UpstreamUnavailable(format!("token request failed: {e}"))
            })?;

        let status = response.status();
        match status {
            s if s.is_success() => {
                let parsed: IssueTokenResponse = response
                    .json()
                    .await
                    .map_err(|e| CacheError::InvalidResponse(format!("undecodable body: {e}")))?;

                if parsed.token.is_empty() {
                    return Err(CacheError::InvalidResponse("empty token".to_string()));
                }

                tracing::debug!(target: "client.issuer", expires_in = parsed.expires_in, "Token issued");
                Ok(SecretString::from(parsed.token))
            }
            StatusCode::UNAUTHORIZED => {
                tracing::debug!(target: "client.issuer", "Issuer rejected credential");
                Err(CacheError::AuthenticationFailed)
            }
            StatusCode::BAD_REQUEST => Err(CacheError::InvalidCredential(
                "issuer rejected the request as malformed".to_string(),
            )),
            _ => {
                tracing::warn!(target: "client.issuer", status = %status, "Unexpected issuer response");
                Err(CacheError::UpstreamUnavailable(format!(
                    "issuer returned status {status}"
                )))
            }
        }
    }
}
