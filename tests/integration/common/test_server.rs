use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trip_planner::adapters::health_handler::HealthHandler;
use trip_planner::adapters::tool_handler::BuiltinToolHandler;
use trip_planner::agents::llm::OpenAiProvider;
use trip_planner::config::Settings;
use trip_planner::planner::CrewRuntime;

pub const API_KEY: &str = "test-key";
pub const SEARCH_KEY_ENV: &str = "TRIP_PLANNER_IT_SERPER_KEY";
pub const SEARCH_SNIPPET: &str = "Ride tram 28 and try pastel de nata.";

#[derive(Default)]
pub struct Counters {
    pub completions: AtomicUsize,
    pub searches: AtomicUsize,
}

#[derive(Clone)]
struct FakeState {
    answer: String,
    counters: Arc<Counters>,
}

/// Stands in for both the chat completions API and the Serper API.
///
/// The fake model asks for one search per task when the search tool is
/// offered, then answers with its fixed text followed by the search results.
async fn chat_completions(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer test-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }
    state.counters.completions.fetch_add(1, Ordering::SeqCst);

    let last = body["messages"]
        .as_array()
        .and_then(|m| m.last())
        .cloned()
        .unwrap_or(Value::Null);
    let offers_search = body["tools"]
        .as_array()
        .map(|tools| tools.iter().any(|t| t["function"]["name"] == "search_internet"))
        .unwrap_or(false);

    let message = if last["role"] == "tool" {
        json!({
            "role": "assistant",
            "content": format!("{}\n\nSources:\n{}", state.answer, last["content"].as_str().unwrap_or(""))
        })
    } else if offers_search {
        json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_search",
                "type": "function",
                "function": {
                    "name": "search_internet",
                    "arguments": "{\"query\":\"Lisbon in May\"}"
                }
            }]
        })
    } else {
        json!({ "role": "assistant", "content": state.answer })
    };

    let finish_reason = if message.get("tool_calls").is_some() { "tool_calls" } else { "stop" };

    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-test",
            "choices": [{ "index": 0, "message": message, "finish_reason": finish_reason }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
        })),
    )
}

async fn serper_search(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return (StatusCode::FORBIDDEN, Json(json!({ "message": "Unauthorized." })));
    }
    state.counters.searches.fetch_add(1, Ordering::SeqCst);

    (
        StatusCode::OK,
        Json(json!({
            "searchParameters": { "q": body["q"] },
            "organic": [
                {
                    "title": "Lisbon Travel Guide",
                    "link": "https://example.com/lisbon",
                    "snippet": SEARCH_SNIPPET
                },
                { "title": "No snippet", "link": "https://example.com/incomplete" }
            ]
        })),
    )
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub counters: Arc<Counters>,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_answer(&"Day 1: Alfama walking tour. ".repeat(80)).await
    }

    /// Start the API against fake upstreams whose model always answers `answer`
    pub async fn with_answer(answer: &str) -> Self {
        std::env::set_var(SEARCH_KEY_ENV, API_KEY);

        let counters = Arc::new(Counters::default());
        let fake = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .route("/search", post(serper_search))
            .with_state(FakeState {
                answer: answer.to_string(),
                counters: counters.clone(),
            });
        let upstream = spawn(fake).await;

        let mut settings = Settings::default();
        settings.server.host = "127.0.0.1".to_string();
        settings.server.port = 0;
        settings.llm.base_url = Some(format!("http://{}/v1", upstream));
        settings.search.endpoint = format!("http://{}/search", upstream);
        settings.search.api_key_env = SEARCH_KEY_ENV.to_string();

        let llm = Arc::new(OpenAiProvider::with_api_key(&settings.llm, API_KEY).unwrap());
        let tools = Arc::new(BuiltinToolHandler::from_settings(&settings.search).unwrap());
        let runtime = Arc::new(CrewRuntime::new(&settings, llm, tools).unwrap());
        let health_handler = Arc::new(HealthHandler::new(Arc::new(settings)));

        let app = trip_planner::create_app(runtime, health_handler);
        let addr = spawn(app).await;
        let base_url = format!("http://{}", addr);

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestServer {
            addr,
            base_url,
            counters,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn completions(&self) -> usize {
        self.counters.completions.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.counters.searches.load(Ordering::SeqCst)
    }
}
