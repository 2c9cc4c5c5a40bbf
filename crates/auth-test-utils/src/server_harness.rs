//! Test server harness for E2E testing
//!
//! Spawns the real issuer and wrapups routers on 127.0.0.1:0.

use crate::crypto_fixtures::{test_key_pair, TestKeyPair};
use crate::test_ids::{
    TEST_AUDIENCE, TEST_ISSUER, TEST_KEY_SEED_ISSUER, TEST_PRINCIPAL_ALICE, TEST_PRINCIPAL_BOB,
    TEST_SECRET_ALICE, TEST_SECRET_BOB,
};
use auth_service::credentials::{CredentialStore, MockCredentialStore};
use auth_service::handlers::AppState as AuthAppState;
use auth_service::services::TokenIssuer;
use common::jwt::ClaimExpectations;
use common::types::{IssueTokenRequest, IssueTokenResponse};
use common::validator::{DelegatedValidator, LocalValidator, TokenValidator, VALIDATE_PATH};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use wrapups_service::repositories::{InMemoryWrapupStore, WrapupStore};
use wrapups_service::routes::AppState as WrapupsAppState;

/// Install the service's recorder, or fall back to a private one when a
/// recorder is already installed in this test process.
fn metrics_handle(install: fn() -> Result<PrometheusHandle, String>) -> PrometheusHandle {
    install().unwrap_or_else(|_| PrometheusBuilder::new().build_recorder().handle())
}

async fn serve(app: axum::Router) -> Result<(SocketAddr, JoinHandle<()>), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

    let addr = listener
        .local_addr()
        .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

    let handle = tokio::spawn(async move {
        let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
        if let Err(e) = axum::serve(listener, make_service).await {
            eprintln!("Test server error: {}", e);
        }
    });

    Ok((addr, handle))
}

/// Running issuer instance.
///
/// # Example
/// ```rust,ignore
/// let server = TestAuthServer::spawn().await?;
/// let token = server
///     .issue_token(TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE, TEST_AUDIENCE)
///     .await?;
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    keys: TestKeyPair,
    handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn an issuer that knows alice and bob.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(MockCredentialStore::with_credentials([
            (TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE),
            (TEST_PRINCIPAL_BOB, TEST_SECRET_BOB),
        ])))
        .await
    }

    /// Spawn an issuer over an arbitrary credential store.
    ///
    /// Signs with the seed-1 fixture key and issuer name `TEST_ISSUER`.
    pub async fn spawn_with_store(
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, anyhow::Error> {
        let keys = test_key_pair(TEST_KEY_SEED_ISSUER)?;

        let issuer = TokenIssuer::new(
            credentials,
            Arc::new(keys.signing_key.clone()),
            TEST_ISSUER.to_string(),
        );
        let validator = LocalValidator::new(
            Arc::new(keys.verifying_key.clone()),
            ClaimExpectations {
                issuer: Some(TEST_ISSUER.to_string()),
                audience: None,
            },
        );

        let state = Arc::new(AuthAppState {
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
        });

        let app = auth_service::routes::build_routes(
            state,
            metrics_handle(auth_service::observability::init_metrics_recorder),
        );
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            keys,
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Full URL of the validation endpoint.
    pub fn validate_url(&self) -> String {
        format!("{}{}", self.url(), VALIDATE_PATH)
    }

    /// Key material the server signs with.
    pub fn keys(&self) -> &TestKeyPair {
        &self.keys
    }

    /// Issue a token over HTTP, failing unless the server answers 200.
    pub async fn issue_token(
        &self,
        principal: &str,
        secret: &str,
        audience: &str,
    ) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/api/v1/auth/token", self.url()))
            .json(&IssueTokenRequest {
                principal: principal.to_string(),
                secret: secret.to_string().into(),
                audience: audience.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Token issuance failed with status {}", status);
        }

        Ok(response.json::<IssueTokenResponse>().await?.token)
    }

    /// A validator that delegates to this server.
    pub fn delegated_validator(
        &self,
        timeout: Duration,
    ) -> Result<DelegatedValidator, anyhow::Error> {
        Ok(DelegatedValidator::new(self.validate_url(), timeout)?)
    }
}

/// Running wrapups service instance.
pub struct TestWrapupsServer {
    addr: SocketAddr,
    store: Arc<dyn WrapupStore>,
    handle: JoinHandle<()>,
}

impl TestWrapupsServer {
    /// Spawn with an empty in-memory store.
    pub async fn spawn(validator: Arc<dyn TokenValidator>) -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(InMemoryWrapupStore::new()), validator).await
    }

    /// Spawn with local validation against the seed-1 fixture key,
    /// expecting `TEST_ISSUER` and `TEST_AUDIENCE`.
    pub async fn spawn_local() -> Result<Self, anyhow::Error> {
        let keys = test_key_pair(TEST_KEY_SEED_ISSUER)?;
        let validator = LocalValidator::new(
            Arc::new(keys.verifying_key),
            ClaimExpectations {
                issuer: Some(TEST_ISSUER.to_string()),
                audience: Some(TEST_AUDIENCE.to_string()),
            },
        );
        Self::spawn(Arc::new(validator)).await
    }

    pub async fn spawn_with_store(
        store: Arc<dyn WrapupStore>,
        validator: Arc<dyn TokenValidator>,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(WrapupsAppState {
            store: store.clone(),
            validator,
        });

        let app = wrapups_service::routes::build_routes(
            state,
            metrics_handle(wrapups_service::observability::init_metrics_recorder),
        );
        let (addr, handle) = serve(app).await?;

        Ok(Self {
            addr,
            store,
            handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The store behind the server, for asserting side effects.
    pub fn store(&self) -> &Arc<dyn WrapupStore> {
        &self.store
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl Drop for TestWrapupsServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
