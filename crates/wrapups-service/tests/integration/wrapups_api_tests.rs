//! Wrap-up document API behind a valid token.

use auth_test_utils::*;
use reqwest::StatusCode;
use serde_json::json;

fn alice_token() -> Result<String, anyhow::Error> {
    let signing_key = test_key_pair(TEST_KEY_SEED_ISSUER)?.signing_key;
    Ok(TestClaimsBuilder::new().sign_with(&signing_key))
}

#[tokio::test]
async fn test_create_get_and_list() -> Result<(), anyhow::Error> {
    let server = TestWrapupsServer::spawn_local().await?;
    let token = alice_token()?;
    let client = reqwest::Client::new();

    for (title, wrapup) in [("Standup", "release blocked on QA"), ("Retro", "more tests")] {
        let response = client
            .post(format!("{}/api/v1/wrapups", server.url()))
            .bearer_auth(&token)
            .json(&json!({"title": title, "wrapup": wrapup, "note": "n/a"}))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let all: serde_json::Value = client
        .get(format!("{}/api/v1/wrapups", server.url()))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(all["count"], 2);
    assert_eq!(all["wrapups"][0]["title"], "Standup");

    let filtered: serde_json::Value = client
        .get(format!("{}/api/v1/wrapups", server.url()))
        .query(&[("filter", "QA")])
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(filtered["count"], 1);

    let id = filtered["wrapups"][0]["id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("wrapup has no id"))?
        .to_string();

    let fetched = client
        .get(format!("{}/api/v1/wrapups/{}", server.url(), id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched: serde_json::Value = fetched.json().await?;
    assert_eq!(fetched["title"], "Standup");
    assert_eq!(fetched["note"], "n/a");
    assert!(fetched["create_time"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_create_without_title_is_400() -> Result<(), anyhow::Error> {
    let server = TestWrapupsServer::spawn_local().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/wrapups", server.url()))
        .bearer_auth(alice_token()?)
        .json(&json!({"wrapup": "no title here"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.store().list("").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_malformed_body_is_400_in_error_envelope() -> Result<(), anyhow::Error> {
    let server = TestWrapupsServer::spawn_local().await?;
    let token = alice_token()?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/wrapups", server.url());

    let wrong_type = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({"title": 7}))
        .send()
        .await?;
    let not_json = client
        .post(&url)
        .bearer_auth(&token)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("title=Standup")
        .send()
        .await?;

    for response in [wrong_type, not_json] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(
            body["error"]["message"],
            wrapups_service::handlers::wrapups::INVALID_BODY_MESSAGE
        );
    }
    assert!(server.store().list("").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_get_blank_and_unknown_ids() -> Result<(), anyhow::Error> {
    let server = TestWrapupsServer::spawn_local().await?;
    let token = alice_token()?;
    let client = reqwest::Client::new();

    let blank = client
        .get(format!("{}/api/v1/wrapups/%20", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let unknown = client
        .get(format!("{}/api/v1/wrapups/does-not-exist", server.url()))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = unknown.json().await?;
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    Ok(())
}
