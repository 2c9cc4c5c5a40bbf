//! `POST /api/v1/auth/validate` over HTTP.

use auth_test_utils::*;
use reqwest::StatusCode;
use serde_json::json;

async fn validate(server: &TestAuthServer, token: &str) -> Result<serde_json::Value, anyhow::Error> {
    let response = reqwest::Client::new()
        .post(server.validate_url())
        .json(&json!({ "token": token }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(response.json().await?)
}

#[tokio::test]
async fn test_issued_token_is_valid() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let token = server
        .issue_token(TEST_PRINCIPAL_ALICE, TEST_SECRET_ALICE, TEST_AUDIENCE)
        .await?;

    let body = validate(&server, &token).await?;

    assert_eq!(body, json!({"valid": true, "principal": TEST_PRINCIPAL_ALICE}));
    Ok(())
}

#[tokio::test]
async fn test_invalid_tokens_report_invalid_with_empty_principal() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let issuer_key = test_key_pair(TEST_KEY_SEED_ISSUER)?.signing_key;
    let foreign_key = test_key_pair(TEST_KEY_SEED_FOREIGN)?.signing_key;

    let cases = [
        ("expired", TestClaimsBuilder::new().expired().sign_with(&issuer_key)),
        ("not yet valid", TestClaimsBuilder::new().not_yet_valid().sign_with(&issuer_key)),
        ("foreign key", TestClaimsBuilder::new().sign_with(&foreign_key)),
        ("wrong issuer", TestClaimsBuilder::new().with_issuer("someone-else").sign_with(&issuer_key)),
        ("garbage", "not.a.jwt".to_string()),
        ("oversized", "a".repeat(9000)),
    ];

    for (name, token) in cases {
        let body = validate(&server, &token).await?;
        assert_eq!(body["valid"], false, "{name} should be invalid");
        assert_eq!(body["principal"], "", "{name} should carry no principal");
    }

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_reports_invalid() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn().await?;
    let client = reqwest::Client::new();

    let empty_object = client.post(server.validate_url()).json(&json!({})).send().await?;
    let wrong_type = client
        .post(server.validate_url())
        .json(&json!({"token": 42}))
        .send()
        .await?;

    for response in [empty_object, wrong_type] {
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body, json!({"valid": false, "principal": ""}));
    }

    Ok(())
}
