//! Supabase backend tests against a mocked PostgREST endpoint

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use veritus::config::SupabaseConfig;
use veritus::domain::{
    ContentRepository, DomainError, EngagementRepository, ProfileRepository, Role,
    SignupRepository, Table, VolunteerSignup,
};
use veritus::infrastructure::supabase::SupabaseClient;
use veritus::services::AnalyticsService;

const ANON_KEY: &str = "test-anon-key";

fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&SupabaseConfig {
        url: server.uri(),
        anon_key: ANON_KEY.to_string(),
    })
    .expect("client")
}

#[tokio::test]
async fn test_count_reads_content_range() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/articles"))
        .and(header("Prefer", "count=exact"))
        .and(header("apikey", ANON_KEY))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "0-0/42"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.count(Table::Articles).await.unwrap(), 42);
}

#[tokio::test]
async fn test_count_without_header_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/stories"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client_for(&server).count(Table::Stories).await;
    assert!(matches!(result, Err(DomainError::Network(_))));
}

#[tokio::test]
async fn test_server_error_maps_to_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client_for(&server).article_views().await;
    assert!(matches!(result, Err(DomainError::Network(_))));
}

#[tokio::test]
async fn test_article_views_and_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .and(query_param("select", "views"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "views": 12 },
            { "views": null },
            { "views": 30 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .and(query_param("select", "category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "category": "Politics" },
            { "category": null }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.article_views().await.unwrap(), vec![12, 0, 30]);
    assert_eq!(
        client.article_categories().await.unwrap(),
        vec![Some("Politics".to_string()), None]
    );
}

#[tokio::test]
async fn test_recent_articles_accepts_numeric_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/articles"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 7, "title": "Budget vote", "created_at": "2026-10-16T09:00:00+00:00" }
        ])))
        .mount(&server)
        .await;

    let rows = client_for(&server).recent_articles(5).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "7");
    assert_eq!(rows[0].summary, "Budget vote");
    assert_eq!(
        rows[0].created_at,
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_profile_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "u-1",
            "full_name": "Ada Lovelace",
            "role": "admin",
            "created_at": "2026-01-01T00:00:00+00:00"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.ghost"))
        .respond_with(ResponseTemplate::new(406).set_body_json(serde_json::json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let profile = client.find_by_id("u-1").await.unwrap();
    assert_eq!(profile.role, Role::Admin);
    assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));

    assert!(matches!(
        client.find_by_id("ghost").await,
        Err(DomainError::NotFound)
    ));

    // Through the service a missing profile is simply absent
    let shared = Arc::new(client);
    let service = AnalyticsService::new(shared.clone(), shared.clone(), shared);
    assert!(service.get_profile("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_signup_insert_posts_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/campaign_signups"))
        .and(header("Prefer", "return=minimal"))
        .and(body_partial_json(serde_json::json!({
            "campaign": "measure-12",
            "email": "grace@example.org",
            "interests": ["canvassing"]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let signup = VolunteerSignup {
        campaign: "measure-12".to_string(),
        name: "Grace Hopper".to_string(),
        email: "grace@example.org".to_string(),
        phone: None,
        zip_code: Some("94110".to_string()),
        interests: vec!["canvassing".to_string()],
        created_at: Utc::now(),
    };
    client_for(&server).insert(&signup).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_newsletter_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/newsletter_subscribers"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).subscribe("ada@veritus.news").await;
    match result {
        Err(DomainError::Validation(msg)) => assert_eq!(msg, "Email already subscribed"),
        other => panic!("expected validation error, got {:?}", other),
    }
}
