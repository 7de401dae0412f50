//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config(base_url: impl Into<String>) -> HttpClientConfig {
    HttpClientConfig::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .max_retries(2)
        .backoff(Duration::from_millis(1), Duration::from_millis(5))
        .build()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(600));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.initial_backoff, Duration::from_millis(500));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.accept_invalid_certs);
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://10.0.0.10:8443/univmax/restapi")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(Duration::from_millis(200), Duration::from_secs(30))
        .rate_limit(RateLimiterConfig::per_second(4))
        .build();

    assert_eq!(
        config.base_url.as_deref(),
        Some("https://10.0.0.10:8443/univmax/restapi")
    );
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert!(config.user_agent.starts_with("array-xray/"));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 4)));
}

#[test]
fn test_calculate_backoff() {
    let config = HttpClientConfig::builder()
        .backoff(Duration::from_millis(500), Duration::from_secs(3))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(1000));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(2000));
    // capped
    assert_eq!(client.calculate_backoff(3), Duration::from_secs(3));
    assert_eq!(client.calculate_backoff(40), Duration::from_secs(3));
}

#[tokio::test]
async fn test_get_returns_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/univmax/restapi/system/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": "V9.1.0.5"
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let response = client.get("/univmax/restapi/system/version").await.unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.json().unwrap()["version"], "V9.1.0.5");
}

#[tokio::test]
async fn test_get_keeps_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let response = client.get("anything").await.unwrap();

    assert_eq!(response.status, 401);
    assert!(!response.is_success());
    assert_eq!(response.body, "Unauthorized");
    assert!(matches!(
        response.json(),
        Err(Error::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn test_get_with_query_in_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/common/Iterator/abc/page"))
        .and(query_param("from", "1"))
        .and(query_param("to", "999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let body = client
        .get("common/Iterator/abc/page?from=1&to=999")
        .await
        .unwrap()
        .json()
        .unwrap();

    assert_eq!(body["result"], serde_json::json!([]));
}

#[tokio::test]
async fn test_basic_credentials_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Basic c21jOnNtYw=="))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri()))
        .unwrap()
        .with_credentials(Credentials::basic("smc", "smc"));

    let response = client.get("/").await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Username", "service"))
        .and(header("Password", "secret"))
        .and(header("Accept", "application/json;format=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = HttpClientConfig::builder().base_url(mock_server.uri()).build();
    for (key, value) in [
        ("Username", "service"),
        ("Password", "secret"),
        ("Accept", "application/json;format=1"),
    ] {
        config.default_headers.insert(key.to_string(), value.to_string());
    }
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.get("vplex/clusters/*").await.unwrap().status, 200);
}

#[tokio::test]
async fn test_timeout_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(200))
        .max_retries(3)
        .build();
    let client = HttpClient::with_config(config)
        .unwrap()
        .with_target("VPlex");

    let err = client.get("/slow").await.unwrap_err();
    match err {
        Error::Timeout { target, timeout_ms } => {
            assert_eq!(target, "VPlex");
            assert_eq!(timeout_ms, 200);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_exhausts_retries() {
    // Reserve a port, then free it so nothing listens there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = HttpClient::with_config(fast_config(format!("http://127.0.0.1:{port}")))
        .unwrap()
        .with_target("VMAX(000295700220)");

    let err = client.get("/univmax/restapi/system/version").await.unwrap_err();
    assert!(err.is_connection_error());
    match err {
        Error::Connection { target, message } => {
            assert_eq!(target, "VMAX(000295700220)");
            assert!(message.contains("3 attempts"), "{message}");
        }
        other => panic!("expected connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .rate_limit(RateLimiterConfig::per_second(100))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    for _ in 0..3 {
        client.get("/").await.unwrap();
    }
}

#[tokio::test]
async fn test_unavailable_then_ok_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/univmax/restapi/system/version"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .up_to_n_times(1)
        .expect(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/univmax/restapi/system/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": "V9.1.0.5"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let response = client.get("/univmax/restapi/system/version").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.json().unwrap()["version"], "V9.1.0.5");
}

#[tokio::test]
async fn test_gateway_errors_exhaust_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri()))
        .unwrap()
        .with_target("VPlex");

    let err = client.get("vplex/clusters/*").await.unwrap_err();
    match err {
        Error::Connection { target, message } => {
            assert_eq!(target, "VPlex");
            assert!(message.contains("3 attempts"), "{message}");
            assert!(message.contains("HTTP 502"), "{message}");
        }
        other => panic!("expected connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(fast_config(mock_server.uri())).unwrap();
    let response = client.get("anything").await.unwrap();

    assert_eq!(response.status, 500);
}
