use super::common;

use common::test_server::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].is_number());
    assert!(body["version"].is_string());
    assert_eq!(body["checks"]["search"], "ok");
}

#[tokio::test]
async fn test_health_ready_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health/ready"))
        .send()
        .await
        .unwrap();

    // The test server always exports the search key
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_health_live_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health/live"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_root_liveness_message() {
    let server = TestServer::new().await;

    let body: serde_json::Value = reqwest::get(server.url("/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["message"], "Trip Planner Crew API is running");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
