//! `POST /api/v1/auth/token` over HTTP.

use auth_service::credentials::MockCredentialStore;
use auth_test_utils::*;
use common::jwt::verify;
use reqwest::{header, StatusCode};
use serde_json::json;
use std::sync::Arc;

async fn post_token(
    server: &TestAuthServer,
    body: serde_json::Value,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(reqwest::Client::new()
        .post(format!("{}/api/v1/auth/token", server.url()))
        .json(&body)
        .send()
        .await?)
}

#[tokio::test]
async fn test_issue_token_success() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response = post_token(
        &server,
        json!({
            "principal": TEST_PRINCIPAL_ALICE,
            "secret": TEST_SECRET_ALICE,
            "audience": TEST_AUDIENCE,
        }),
    )
    .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["expires_in"], 3600);

    let token = body["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("response carried no token"))?;
    token
        .assert_valid_jwt()
        .assert_for_principal(TEST_PRINCIPAL_ALICE)
        .assert_for_audience(TEST_AUDIENCE)
        .assert_issued_by(TEST_ISSUER)
        .assert_expires_in(3600);

    let claims = verify(&token, &server.keys().verifying_key)?;
    assert_eq!(claims.sub, TEST_PRINCIPAL_ALICE);

    Ok(())
}

#[tokio::test]
async fn test_issue_token_for_other_audience() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let token = server
        .issue_token(TEST_PRINCIPAL_BOB, TEST_SECRET_BOB, TEST_OTHER_AUDIENCE)
        .await?;

    token
        .assert_for_principal(TEST_PRINCIPAL_BOB)
        .assert_for_audience(TEST_OTHER_AUDIENCE);

    Ok(())
}

#[tokio::test]
async fn test_wrong_secret_and_unknown_principal_are_indistinguishable() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let wrong_secret = post_token(
        &server,
        json!({"principal": TEST_PRINCIPAL_ALICE, "secret": "guess", "audience": TEST_AUDIENCE}),
    )
    .await?;
    let unknown = post_token(
        &server,
        json!({"principal": "mallory", "secret": "guess", "audience": TEST_AUDIENCE}),
    )
    .await?;

    assert_eq!(wrong_secret.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let wrong_secret_body: serde_json::Value = wrong_secret.json().await?;
    let unknown_body: serde_json::Value = unknown.json().await?;
    assert_eq!(wrong_secret_body, unknown_body);
    assert_eq!(wrong_secret_body["error"]["code"], "INVALID_CREDENTIALS");

    Ok(())
}

#[tokio::test]
async fn test_missing_fields_are_bad_request() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response = post_token(
        &server,
        json!({"principal": TEST_PRINCIPAL_ALICE, "secret": TEST_SECRET_ALICE, "audience": ""}),
    )
    .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");

    Ok(())
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_request_without_detail() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/auth/token", server.url());

    let missing_audience = client
        .post(&url)
        .json(&json!({"principal": TEST_PRINCIPAL_ALICE, "secret": TEST_SECRET_ALICE}))
        .send()
        .await?;
    let not_json = client
        .post(&url)
        .header(header::CONTENT_TYPE, "application/json")
        .body("{principal")
        .send()
        .await?;
    let no_content_type = client.post(&url).body("{}").send().await?;

    for response in [missing_audience, not_json, no_content_type] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
        assert_eq!(
            body["error"]["message"],
            auth_service::handlers::auth_handler::INVALID_BODY_MESSAGE
        );
        assert!(!body.to_string().contains("missing field"));
    }

    Ok(())
}

#[tokio::test]
async fn test_unavailable_store_is_503_without_detail() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_store(Arc::new(MockCredentialStore::unavailable())).await?;

    let response = post_token(
        &server,
        json!({
            "principal": TEST_PRINCIPAL_ALICE,
            "secret": TEST_SECRET_ALICE,
            "audience": TEST_AUDIENCE,
        }),
    )
    .await?;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    let body = response.text().await?;
    assert!(!body.contains("mock store offline"));

    Ok(())
}

#[tokio::test]
async fn test_file_backed_store_end_to_end() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let path = write_credentials_file(dir.path(), &[(TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE)])?;
    let store = auth_service::credentials::FileCredentialStore::open(path).await?;
    let server = TestAuthServer::spawn_with_store(Arc::new(store)).await?;

    let token = server
        .issue_token(TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE, TEST_AUDIENCE)
        .await?;
    token.assert_for_principal(TEST_PRINCIPAL_ALICE);

    let rejected = server
        .issue_token(TEST_PRINCIPAL_ALICE, "not-the-secret", TEST_AUDIENCE)
        .await;
    assert!(rejected.is_err());

    Ok(())
}
