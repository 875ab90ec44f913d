use super::common;

use common::test_server::{TestServer, SEARCH_SNIPPET};
use serde_json::{json, Value};
use trip_planner::config::DEFAULT_FALLBACK_NOTE;

fn trip() -> Value {
    json!({
        "origin": "Berlin",
        "cities": ["Lisbon", "Porto"],
        "date_range": "2025-05-01 to 2025-05-08",
        "interests": "food, surfing"
    })
}

#[tokio::test]
async fn test_trip_plan_runs_crew_once_when_long_enough() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/trip-plan"))
        .json(&trip())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let result = body["result"].as_str().unwrap();
    assert!(result.starts_with("Day 1: Alfama walking tour."));
    assert!(result.contains(SEARCH_SNIPPET));
    assert!(!result.contains(DEFAULT_FALLBACK_NOTE));

    // Three tasks, each one search round-trip plus a final answer
    assert_eq!(server.completions(), 6);
    assert_eq!(server.searches(), 3);
}

#[tokio::test]
async fn test_short_plan_stops_after_five_attempts() {
    let server = TestServer::with_answer("Short plan.").await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/trip-plan"))
        .json(&trip())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let result = body["result"].as_str().unwrap();
    assert!(result.starts_with("Short plan."));
    assert!(result.ends_with(&format!("\n\n{}", DEFAULT_FALLBACK_NOTE)));

    assert_eq!(server.completions(), 6 * 5);
    assert_eq!(server.searches(), 3 * 5);
}

#[tokio::test]
async fn test_single_city_string_is_accepted() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let mut body = trip();
    body["cities"] = json!("Lisbon");

    let response = client
        .post(server.url("/api/trip-plan"))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_invalid_json_is_rejected_before_crew_runs() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/trip-plan"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid JSON");
    assert_eq!(server.completions(), 0);
}

#[tokio::test]
async fn test_list_agents() {
    let server = TestServer::new().await;

    let agents: Vec<Value> = reqwest::get(server.url("/api/agents"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let roles: Vec<&str> = agents.iter().map(|a| a["role"].as_str().unwrap()).collect();
    assert_eq!(
        roles,
        vec![
            "Expert Travel Agent",
            "City Selection Expert",
            "Local Tour Guide",
            "Result Structuring Expert"
        ]
    );
}
