// HTTP probe against local mock endpoints.

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitewatch_checker::{HttpProber, ProbeSettings, Prober};
use sitewatch_types::SiteStatus;

fn prober(timeout: Duration) -> HttpProber {
    HttpProber::new(ProbeSettings {
        timeout,
        max_redirects: 5,
        user_agent: "sitewatch-test".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_success_is_online() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let result = prober(Duration::from_secs(5))
        .probe(&format!("{}/health", server.uri()))
        .await;

    assert_eq!(result.status, SiteStatus::Online);
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = prober(Duration::from_secs(5))
        .probe(&format!("{}/old", server.uri()))
        .await;

    assert_eq!(result.status, SiteStatus::Online);
}

#[tokio::test]
async fn test_redirect_loop_is_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let result = prober(Duration::from_secs(5))
        .probe(&format!("{}/loop", server.uri()))
        .await;

    assert_eq!(result.status, SiteStatus::Offline);
    assert_eq!(result.latency_ms, 0);
}

#[tokio::test]
async fn test_server_error_is_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = prober(Duration::from_secs(5)).probe(&server.uri()).await;

    assert_eq!(result.status, SiteStatus::Offline);
    assert_eq!(result.latency_ms, 0);
}

#[tokio::test]
async fn test_not_found_is_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = prober(Duration::from_secs(5)).probe(&server.uri()).await;
    assert_eq!(result.status, SiteStatus::Offline);
}

#[tokio::test]
async fn test_timeout_is_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let result = prober(Duration::from_millis(200)).probe(&server.uri()).await;

    assert_eq!(result.status, SiteStatus::Offline);
    assert_eq!(result.latency_ms, 0);
}

#[tokio::test]
async fn test_unreachable_host_is_offline() {
    // 绑定后立即释放，得到一个没有监听者的端口
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = prober(Duration::from_secs(2))
        .probe(&format!("http://127.0.0.1:{}/", port))
        .await;

    assert_eq!(result.status, SiteStatus::Offline);
    assert_eq!(result.latency_ms, 0);
}

#[tokio::test]
async fn test_malformed_url_is_offline() {
    let result = prober(Duration::from_secs(2)).probe("not a url").await;

    assert_eq!(result.status, SiteStatus::Offline);
    assert_eq!(result.latency_ms, 0);
}
