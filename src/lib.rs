//! # Trip Planner Crew
//!
//! A small crew of LLM agents that researches destinations and drafts travel
//! itineraries, exposed over HTTP.
//!
//! ## Features
//!
//! - **Personas**: Expert Travel Agent, City Selection Expert, Local Tour Guide
//!   and Result Structuring Expert
//! - **Tools**: Serper web search and a restricted arithmetic calculator
//! - **Sequential crew**: every task builds on the answers before it
//! - **Length guard**: the crew is re-run until the itinerary is long enough
//! - **Health Checks**: liveness and readiness endpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trip_planner::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let settings = Settings::new()?;
//!
//!     // Server will start on configured host:port
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: Trip request types and the tool port
//! - **Agents**: LLM client, ReAct agent and sequential crew
//! - **Planner**: Travel personas, task templates and the retry loop
//! - **Adapters**: HTTP handlers and tools
//! - **Config**: Configuration management

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;
pub mod domain;
pub mod planner;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use crate::planner::CrewRuntime;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `runtime` - Shared crew runtime (LLM clients, tools, crew settings)
/// * `health_handler` - Health check handler
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(runtime: Arc<CrewRuntime>, health_handler: Arc<HealthHandler>) -> Router {
    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let api_router = Router::new()
        .route("/trip-plan", post(api_handler::trip_plan))
        .route("/agents", get(api_handler::list_agents))
        .with_state(ApiState { runtime });

    Router::new()
        .route("/", get(api_handler::home))
        .nest("/api", api_router)
        .merge(health_router)
        .layer(TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
