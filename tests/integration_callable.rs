#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, unreachable_pub, missing_debug_implementations)]
use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_callable_success_envelope() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(app.callable_url())
        .json(&json!({ "data": { "message": "This is a sufficiently long test message.", "subject": "App" } }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "result": { "ok": true } }));

    let (_, email) = &app.mailer.sent()[0];
    assert_eq!(email.subject, "[Smarthome Feedback] App");
}

#[tokio::test]
async fn test_callable_short_message_is_invalid_argument() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.post(app.callable_url()).json(&json!({ "data": { "message": "short" } })).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    assert!(body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_callable_missing_credentials_is_failed_precondition() {
    let mut config = common::get_test_config();
    config.mail.resend_api_key = Some("   ".to_string());
    let app = common::TestApp::spawn_with_config(config).await;

    let resp = app
        .client
        .post(app.callable_url())
        .json(&json!({ "data": { "message": "This is a sufficiently long test message." } }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["status"], "FAILED_PRECONDITION");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_callable_provider_failure_is_internal() {
    let app = common::TestApp::spawn().await;
    app.mailer.fail_next_sends();

    let resp = app
        .client
        .post(app.callable_url())
        .json(&json!({ "data": { "message": "This is a sufficiently long test message." } }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["status"], "INTERNAL");
    assert!(!body.to_string().contains("provider unavailable"));
}

#[tokio::test]
async fn test_callable_mistyped_timestamp_is_accepted() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(app.callable_url())
        .json(&json!({ "data": { "message": "This is a sufficiently long test message.", "timestamp": 1.5 } }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "result": { "ok": true } }));
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_callable_requires_data_envelope() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(app.callable_url())
        .json(&json!({ "message": "This is a sufficiently long test message." }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["status"], "INVALID_ARGUMENT");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_callable_rejects_get() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(app.callable_url()).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
