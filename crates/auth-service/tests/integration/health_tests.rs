//! Liveness and metrics endpoints.

use auth_test_utils::{TestAuthServer, TEST_AUDIENCE, TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;

    let response = reqwest::Client::new()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_is_public() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    server
        .issue_token(TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE, TEST_AUDIENCE)
        .await?;

    let response = reqwest::Client::new()
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;

    // The recorder may be a private fallback, so only the status is stable
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
