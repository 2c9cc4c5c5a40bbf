//! Delegated validation against a live issuer and a stalled one.

use auth_test_utils::*;
use common::validator::{DelegatedValidator, VALIDATE_PATH};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_delegated_mode_end_to_end() -> Result<(), anyhow::Error> {
    let auth = TestAuthServer::spawn().await?;
    let validator = auth.delegated_validator(Duration::from_secs(5))?;
    let wrapups = TestWrapupsServer::spawn(Arc::new(validator)).await?;

    let token = auth
        .issue_token(TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE, TEST_AUDIENCE)
        .await?;

    let client = reqwest::Client::new();
    let created = client
        .post(format!("{}/api/v1/wrapups", wrapups.url()))
        .bearer_auth(&token)
        .json(&json!({"title": "Retro", "wrapup": "ship smaller"}))
        .send()
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);

    let me: serde_json::Value = client
        .get(format!("{}/api/v1/me", wrapups.url()))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["principal"], TEST_PRINCIPAL_ALICE);

    let expired = TestClaimsBuilder::new()
        .expired()
        .sign_with(&auth.keys().signing_key);
    let rejected = client
        .get(format!("{}/api/v1/wrapups", wrapups.url()))
        .bearer_auth(&expired)
        .send()
        .await?;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_stalled_issuer_is_503_not_401() -> Result<(), anyhow::Error> {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(VALIDATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"valid": true, "principal": TEST_PRINCIPAL_ALICE}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let validator = DelegatedValidator::for_issuer(&mock_server.uri(), Duration::from_millis(100))?;
    let wrapups = TestWrapupsServer::spawn(Arc::new(validator)).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/api/v1/wrapups", wrapups.url()))
        .bearer_auth("any-token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().get(reqwest::header::WWW_AUTHENTICATE).is_none());

    Ok(())
}

#[tokio::test]
async fn test_unreachable_issuer_is_503() -> Result<(), anyhow::Error> {
    // Nothing listens on port 1
    let validator = DelegatedValidator::new(
        format!("http://127.0.0.1:1{VALIDATE_PATH}"),
        Duration::from_millis(500),
    )?;
    let wrapups = TestWrapupsServer::spawn(Arc::new(validator)).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/api/v1/wrapups", wrapups.url()))
        .bearer_auth("any-token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}
