//! Authenticated wrapups API client.
//!
//! Every call presents the cached token. When the service answers 401 to a
//! token read from the cache, the client evicts it, obtains a new one, and
//! retries the call once. A 401 to a token issued for this call is returned
//! as `ClientError::Unauthenticated` without another round trip.

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::issuer_client::HttpIssuerClient;
use crate::profile::Profile;
use crate::token_cache::{TokenCache, TokenSource};
use common::secret::ExposeSecret;
use common::types::{ListWrapupsResponse, NewWrapup, Wrapup};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Deserialize)]
struct MeBody {
    principal: String,
}

pub struct WrapupsClient {
    base_url: String,
    http_client: Client,
    cache: TokenCache,
}

impl WrapupsClient {
    /// Client for `service_url` drawing tokens from `cache`.
    ///
    /// # Errors
    ///
    /// Returns `Http` if the HTTP client cannot be built.
    pub fn new(service_url: &str, cache: TokenCache, timeout: Duration) -> Result<Self, ClientError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: service_url.trim_end_matches('/').to_string(),
            http_client,
            cache,
        })
    }

    /// Client wired from a profile's `config` file.
    ///
    /// # Errors
    ///
    /// - `Cache(InvalidConfig)` if the config file is malformed
    /// - `Http` if an HTTP client cannot be built
    pub async fn from_profile(profile: Profile) -> Result<Self, ClientError> {
        let config = ClientConfig::load(&profile).await?;
        let issuer = HttpIssuerClient::new(&config.auth_url, DEFAULT_REQUEST_TIMEOUT)?;
        let cache = TokenCache::new(profile, Arc::new(issuer), config.audience);

        Self::new(&config.service_url, cache, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.cache
    }

    /// `GET /api/v1/wrapups`, optionally filtered.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    #[instrument(skip_all)]
    pub async fn list(&self, filter: Option<&str>) -> Result<ListWrapupsResponse, ClientError> {
        let url = format!("{}/api/v1/wrapups", self.base_url);
        self.send_authenticated(|http| {
            let request = http.get(&url);
            match filter {
                Some(filter) => request.query(&[("filter", filter)]),
                None => request,
            }
        })
        .await
    }

    /// `GET /api/v1/wrapups/{id}`
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    #[instrument(skip_all)]
    pub async fn get(&self, id: &str) -> Result<Wrapup, ClientError> {
        let url = format!("{}/api/v1/wrapups/{}", self.base_url, id);
        self.send_authenticated(|http| http.get(&url)).await
    }

    /// `POST /api/v1/wrapups`
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    #[instrument(skip_all)]
    pub async fn create(&self, new: &NewWrapup) -> Result<Wrapup, ClientError> {
        let url = format!("{}/api/v1/wrapups", self.base_url);
        self.send_authenticated(|http| http.post(&url).json(new)).await
    }

    /// `GET /api/v1/me`: the principal the service sees.
    ///
    /// # Errors
    ///
    /// See [`ClientError`].
    #[instrument(skip_all)]
    pub async fn whoami(&self) -> Result<String, ClientError> {
        let url = format!("{}/api/v1/me", self.base_url);
        let me: MeBody = self.send_authenticated(|http| http.get(&url)).await?;
        Ok(me.principal)
    }

    async fn send_authenticated<T, F>(&self, build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let token = self.cache.load_or_issue().await?;
        let response = build(&self.http_client)
            .bearer_auth(token.secret.expose_secret())
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return handle_response(response).await;
        }

        if token.source == TokenSource::Issuer {
            tracing::warn!(target: "client.wrapups", "Freshly issued token refused");
            return Err(ClientError::Unauthenticated);
        }

        tracing::info!(target: "client.wrapups", "Cached token refused; evicting and reissuing once");
        self.cache.evict().await?;
        let token = self.cache.load_or_issue().await?;
        let response = build(&self.http_client)
            .bearer_auth(token.secret.expose_secret())
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(target: "client.wrapups", "Freshly issued token refused");
            return Err(ClientError::Unauthenticated);
        }

        handle_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if !status.is_success() {
        let (code, message) = match response.json::<ErrorBody>().await {
            Ok(body) => (body.error.code, body.error.message),
            Err(_) => (
                "UNKNOWN".to_string(),
                status.canonical_reason().unwrap_or("unknown").to_string(),
            ),
        };
        return Err(ClientError::RequestFailed {
            status: status.as_u16(),
            code,
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
