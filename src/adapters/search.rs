//! Internet search tool backed by the Serper API
//!
//! Serper answers a `{"q": ...}` POST with Google results; the useful part is
//! the `organic` array. Anything that prevents us from getting that array
//! (missing key, HTTP failure, odd payload) degrades to an apology the model
//! can read, never to an error.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::tool_handler::BuiltinTool;
use crate::config::SearchSettings;
use crate::domain::Tool;

pub const TOOL_NAME: &str = "search_internet";

pub const NOT_FOUND_MESSAGE: &str =
    "Sorry, I couldn't find anything about that, there could be an error with your Serper API key.";

const RESULT_SEPARATOR: &str = "\n-----------------";

pub struct SerperSearchTool {
    client: reqwest::Client,
    endpoint: String,
    api_key_env: String,
    top_results: usize,
}

impl SerperSearchTool {
    pub fn new(settings: &SearchSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key_env: settings.api_key_env.clone(),
            top_results: settings.top_results,
        })
    }

    /// Run a query and format the top results
    pub async fn search(&self, query: &str) -> String {
        let api_key = match std::env::var(&self.api_key_env) {
            Ok(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!(env = %self.api_key_env, "Search API key is not set");
                return NOT_FOUND_MESSAGE.to_string();
            }
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&json!({ "q": query }))
            .send()
            .await;

        let body: Value = match response {
            Ok(resp) => match resp.json().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(error = %e, "Search response was not JSON");
                    return NOT_FOUND_MESSAGE.to_string();
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Search request failed");
                return NOT_FOUND_MESSAGE.to_string();
            }
        };

        format_results(&body, self.top_results)
    }
}

/// Format the first `top` organic results of a Serper response.
///
/// Entries lacking a title, link or snippet are skipped, but still count
/// toward `top`.
pub fn format_results(body: &Value, top: usize) -> String {
    let organic = match body.get("organic").and_then(Value::as_array) {
        Some(results) => results,
        None => return NOT_FOUND_MESSAGE.to_string(),
    };

    organic
        .iter()
        .take(top)
        .filter_map(|result| {
            let title = result.get("title")?.as_str()?;
            let link = result.get("link")?.as_str()?;
            let snippet = result.get("snippet")?.as_str()?;
            Some(format!(
                "Title: {}\nLink: {}\nSnippet: {}\n{}",
                title, link, snippet, RESULT_SEPARATOR
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl BuiltinTool for SerperSearchTool {
    fn tool(&self) -> Tool {
        Tool {
            name: TOOL_NAME.to_string(),
            description: "Search the internet for a given topic and return relevant results."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: &Value) -> String {
        let query = match args {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("query").and_then(Value::as_str),
            _ => None,
        };

        match query {
            Some(q) if !q.trim().is_empty() => {
                tracing::debug!(query = q, "Searching the internet");
                self.search(q).await
            }
            _ => NOT_FOUND_MESSAGE.to_string(),
        }
    }
}
