use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Settings;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    /// Model used by personas without their own LLM
    pub llm_model: String,
    /// Whether the search API key is present in the environment
    pub search: String,
}

pub struct HealthHandler {
    settings: Arc<Settings>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            start_time: std::time::Instant::now(),
        }
    }

    fn search_configured(&self) -> bool {
        std::env::var(&self.settings.search.api_key_env)
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: HealthChecks {
                llm_model: self.settings.llm.model.clone(),
                search: if self.search_configured() { "ok" } else { "missing_api_key" }.to_string(),
            },
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - 503 until the search API key is available, since
    /// every research task depends on it
    pub async fn ready(&self) -> impl IntoResponse {
        if self.search_configured() {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "message": "Server is ready to accept requests"
            })))
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "message": format!("{} is not set", self.settings.search.api_key_env)
            })))
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(serde_json::json!({
            "status": "alive",
            "message": "Server is alive"
        })))
    }
}
