//! Request authenticator behaviour with local validation.

use async_trait::async_trait;
use auth_test_utils::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::types::{NewWrapup, Wrapup};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use wrapups_service::errors::WuError;
use wrapups_service::repositories::{InMemoryWrapupStore, WrapupStore};
use wrapups_service::routes::{build_routes, AppState};

/// Counts every store call so tests can prove a handler never ran.
#[derive(Default)]
struct CountingStore {
    inner: InMemoryWrapupStore,
    calls: AtomicUsize,
}

#[async_trait]
impl WrapupStore for CountingStore {
    async fn list(&self, filter: &str) -> Result<Vec<Wrapup>, WuError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list(filter).await
    }

    async fn get(&self, id: &str) -> Result<Option<Wrapup>, WuError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn create(&self, new: NewWrapup) -> Result<Wrapup, WuError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create(new).await
    }
}

fn local_app(store: Arc<CountingStore>) -> Result<axum::Router, anyhow::Error> {
    let keys = test_key_pair(TEST_KEY_SEED_ISSUER)?;
    let validator = common::validator::LocalValidator::new(
        Arc::new(keys.verifying_key),
        common::jwt::ClaimExpectations {
            issuer: Some(TEST_ISSUER.to_string()),
            audience: Some(TEST_AUDIENCE.to_string()),
        },
    );
    let state = Arc::new(AppState {
        store,
        validator: Arc::new(validator),
    });
    Ok(build_routes(
        state,
        PrometheusBuilder::new().build_recorder().handle(),
    ))
}

fn create_request(authorization: Option<String>) -> Result<Request<Body>, anyhow::Error> {
    let mut builder = Request::post("/api/v1/wrapups").header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    Ok(builder.body(Body::from(json!({"title": "Standup"}).to_string()))?)
}

#[tokio::test]
async fn test_missing_header_rejected_before_handler() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingStore::default());
    let app = local_app(store.clone())?;

    let response = app.oneshot(create_request(None)?).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);

    Ok(())
}

#[tokio::test]
async fn test_expired_token_has_no_side_effect() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingStore::default());
    let app = local_app(store.clone())?;
    let signing_key = test_key_pair(TEST_KEY_SEED_ISSUER)?.signing_key;
    let token = TestClaimsBuilder::new().expired().sign_with(&signing_key);

    let response = app
        .oneshot(create_request(Some(format!("Bearer {token}")))?)
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    assert!(store.inner.is_empty().await);

    Ok(())
}

#[tokio::test]
async fn test_valid_token_reaches_handler() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingStore::default());
    let app = local_app(store.clone())?;
    let signing_key = test_key_pair(TEST_KEY_SEED_ISSUER)?.signing_key;
    let token = TestClaimsBuilder::new().sign_with(&signing_key);

    let response = app
        .oneshot(create_request(Some(format!("bearer {token}")))?)
        .await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.inner.len().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_me_returns_token_principal() -> Result<(), anyhow::Error> {
    let server = TestWrapupsServer::spawn_local().await?;
    let signing_key = test_key_pair(TEST_KEY_SEED_ISSUER)?.signing_key;
    let token = TestClaimsBuilder::new()
        .for_principal(TEST_PRINCIPAL_BOB)
        .sign_with(&signing_key);

    let response = reqwest::Client::new()
        .get(format!("{}/api/v1/me", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["principal"], TEST_PRINCIPAL_BOB);

    Ok(())
}

#[tokio::test]
async fn test_rejected_tokens() -> Result<(), anyhow::Error> {
    let server = TestWrapupsServer::spawn_local().await?;
    let issuer_key = test_key_pair(TEST_KEY_SEED_ISSUER)?.signing_key;
    let foreign_key = test_key_pair(TEST_KEY_SEED_FOREIGN)?.signing_key;

    let cases = [
        ("foreign key", TestClaimsBuilder::new().sign_with(&foreign_key)),
        (
            "other audience",
            TestClaimsBuilder::new()
                .with_audience(TEST_OTHER_AUDIENCE)
                .sign_with(&issuer_key),
        ),
        (
            "other issuer",
            TestClaimsBuilder::new()
                .with_issuer("someone-else")
                .sign_with(&issuer_key),
        ),
        ("not yet valid", TestClaimsBuilder::new().not_yet_valid().sign_with(&issuer_key)),
        ("garbage", "definitely-not-a-jwt".to_string()),
    ];

    let client = reqwest::Client::new();
    for (name, token) in cases {
        let response = client
            .get(format!("{}/api/v1/wrapups", server.url()))
            .bearer_auth(&token)
            .send()
            .await?;

        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED, "{name}");
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "INVALID_TOKEN", "{name}");
    }

    assert!(server.store().list("").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_public_routes_need_no_token() -> Result<(), anyhow::Error> {
    let server = TestWrapupsServer::spawn_local().await?;
    let client = reqwest::Client::new();

    let health = client.get(format!("{}/health", server.url())).send().await?;
    assert_eq!(health.status(), reqwest::StatusCode::OK);

    let metrics = client.get(format!("{}/metrics", server.url())).send().await?;
    assert_eq!(metrics.status(), reqwest::StatusCode::OK);

    Ok(())
}
