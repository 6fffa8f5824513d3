use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::IntoResponse,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use veritus::api;
use veritus::db;
use veritus::domain::{DomainError, SignupRepository, VolunteerSignup};
use veritus::infrastructure::{AppState, Backends, MemoryLocalStore};

// Helper to create a test app
async fn setup_test_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    api::api_router(AppState::from_db(&db, &["measure-12".to_string()]))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let req = match body {
        Some(raw) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_unknown_campaign() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/campaigns/nope/donations", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));

    let (status, _) = send(
        &app,
        "POST",
        "/campaigns/nope/donations",
        Some(r#"{"name":"Ada","amount":100}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_donation_is_rejected() {
    let app = setup_test_app().await;
    let uri = "/campaigns/measure-12/donations";

    let (_, before) = send(&app, "GET", uri, None).await;

    let (status, body) = send(&app, "POST", uri, Some(r#"{"name":"Ada","amount":0}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "POST", uri, Some(r#"{"name":"","amount":500}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, after) = send(&app, "GET", uri, None).await;
    assert_eq!(before["total"], after["total"]);
}

#[tokio::test]
async fn test_donation_beyond_ledger_capacity() {
    let app = setup_test_app().await;
    let uri = "/campaigns/measure-12/donations";
    let payload = format!(r#"{{"name":"Whale","amount":{}}}"#, i64::MAX);

    let (status, _) = send(&app, "POST", uri, Some(&payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The feed still totals cleanly afterwards
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["total"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_malformed_json() {
    let app = setup_test_app().await;

    let (status, _) = send(&app, "POST", "/gamification/xp", Some("invalid json")).await;
    // Axum's Json extractor returns 400 for malformed JSON
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_xp_is_rejected() {
    let app = setup_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/gamification/xp",
        Some(r#"{"amount":-50,"source":"cheat"}"#),
    )
    .await;
    // Negative amounts do not deserialize into an unsigned field
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/gamification/xp",
        Some(r#"{"amount":0,"source":"nothing"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, state) = send(&app, "GET", "/gamification", None).await;
    assert_eq!(state["xp"], 0);
}

#[tokio::test]
async fn test_unknown_achievement() {
    let app = setup_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/gamification/achievements/moonwalker",
        Some(r#"{"progress":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_profile() {
    let app = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/profiles/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Profile not found" }));
}

#[tokio::test]
async fn test_duplicate_newsletter_subscription() {
    let app = setup_test_app().await;
    let payload = r#"{"email":"reader@veritus.news"}"#;

    let (status, _) = send(&app, "POST", "/newsletter", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/newsletter", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already subscribed"));
}

#[tokio::test]
async fn test_invalid_volunteer() {
    let app = setup_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/campaigns/measure-12/volunteers",
        Some(r#"{"name":"Grace","email":"not-an-email"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Sign-up backend that is always offline
struct OfflineSignups;

#[async_trait]
impl SignupRepository for OfflineSignups {
    async fn insert(&self, _signup: &VolunteerSignup) -> Result<(), DomainError> {
        Err(DomainError::Network("backend offline".to_string()))
    }
}

#[tokio::test]
async fn test_volunteer_falls_back_when_backend_is_offline() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let backends = Backends {
        signups: Arc::new(OfflineSignups),
        local_store: Arc::new(MemoryLocalStore::new()),
        ..Backends::sea_orm(&db)
    };
    let app = api::api_router(AppState::new(backends, &["measure-12".to_string()]));

    let (status, body) = send(
        &app,
        "POST",
        "/campaigns/measure-12/volunteers",
        Some(r#"{"name":"Grace","email":"grace@example.org"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["backend"], "local_fallback");
}

#[tokio::test]
async fn test_error_status_mapping() {
    let cases = [
        (DomainError::NotFound, StatusCode::NOT_FOUND),
        (DomainError::Validation("bad".into()), StatusCode::BAD_REQUEST),
        (DomainError::Network("down".into()), StatusCode::BAD_GATEWAY),
        (DomainError::Database("locked".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (DomainError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected) in cases {
        let response = api::error_response(error).into_response();
        assert_eq!(response.status(), expected);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }
}
