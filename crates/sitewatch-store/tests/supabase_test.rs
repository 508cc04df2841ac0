// Supabase store against a mocked REST API.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitewatch_store::{ObservationStore, SiteDirectory, StoreError, SupabaseConfig, SupabaseStore};
use sitewatch_types::{Observation, ProbeResult, SiteStatus};

async fn setup(users_per_page: u32) -> (MockServer, SupabaseStore) {
    let server = MockServer::start().await;
    let store = SupabaseStore::new(SupabaseConfig {
        url: server.uri(),
        service_key: "service-key".to_string(),
        timeout: Duration::from_secs(5),
        users_per_page,
    })
    .unwrap();
    (server, store)
}

#[tokio::test]
async fn test_list_sites() {
    let (server, store) = setup(50).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/sites"))
        .and(query_param("select", "id,url,user_id,name"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "url": "https://www.example.com", "user_id": "u1", "name": "example.com" },
            { "id": "b2", "url": "https://other.net", "user_id": null }
        ])))
        .mount(&server)
        .await;

    let sites = store.list_sites().await.unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].id, "1");
    assert_eq!(sites[0].user_id.as_deref(), Some("u1"));
    assert_eq!(sites[1].id, "b2");
    assert!(sites[1].user_id.is_none());
    assert_eq!(sites[1].display_name(), "other.net");
}

#[tokio::test]
async fn test_list_sites_error_status() {
    let (server, store) = setup(50).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/sites"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let result = store.list_sites().await;
    match result {
        Err(StoreError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_user_emails_paginates() {
    let (server, store) = setup(2).await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": "u1", "email": "alice@x.com" },
                { "id": "u2", "email": null }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [ { "id": "u3", "email": "bob@y.com" } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let emails = store.list_user_emails().await.unwrap();
    assert_eq!(emails.len(), 2);
    assert_eq!(emails.get("u1").map(String::as_str), Some("alice@x.com"));
    assert_eq!(emails.get("u3").map(String::as_str), Some("bob@y.com"));
    assert!(!emails.contains_key("u2"));
}

#[tokio::test]
async fn test_record_posts_site_log() {
    let (server, store) = setup(50).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/site_logs"))
        .and(header("prefer", "return=minimal"))
        .and(body_partial_json(json!({
            "site_id": "s1",
            "status": "offline",
            "response_time": 0
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    store
        .record(&Observation::new("s1", ProbeResult::offline()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_record_rejected() {
    let (server, store) = setup(50).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/site_logs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = store
        .record(&Observation::new("s1", ProbeResult::online(12)))
        .await;
    assert!(matches!(result, Err(StoreError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_latest_observation() {
    let (server, store) = setup(50).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/site_logs"))
        .and(query_param("site_id", "eq.s1"))
        .and(query_param("order", "timestamp.desc"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "site_id": "s1",
                "timestamp": "2024-05-01T12:00:00.123456+00:00",
                "status": "offline",
                "response_time": 0
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/site_logs"))
        .and(query_param("site_id", "eq.s2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let latest = store.latest("s1").await.unwrap().unwrap();
    assert_eq!(latest.status, SiteStatus::Offline);
    assert_eq!(latest.response_time_ms, 0);

    assert!(store.latest("s2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_history_limit() {
    let (server, store) = setup(50).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/site_logs"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "site_id": "s1", "timestamp": "2024-05-01T12:01:00Z", "status": "online", "response_time": 80 },
            { "site_id": "s1", "timestamp": "2024-05-01T12:00:00Z", "status": "offline", "response_time": 0 }
        ])))
        .mount(&server)
        .await;

    let history = store
        .history("s1", sitewatch_store::HISTORY_LIMIT)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].timestamp > history[1].timestamp);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let (server, store) = setup(50).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = store.list_sites().await;
    assert!(matches!(result, Err(StoreError::Decode(_))));
}
