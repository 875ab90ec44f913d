//! REST API handlers for trip planning

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::agents::domain::AgentInfo;
use crate::agents::error::AgentError;
use crate::domain::trip::TripRequestError;
use crate::domain::{TripPlan, TripRequest};
use crate::planner::{CrewRuntime, TripCrew};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub runtime: Arc<CrewRuntime>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON")]
    InvalidJson(String),

    #[error(transparent)]
    InvalidRequest(#[from] TripRequestError),

    #[error("Trip planning failed: {0}")]
    Crew(#[from] AgentError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::InvalidJson(detail) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string(), "detail": detail }),
            ),
            ApiError::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ApiError::Crew(_) => (StatusCode::BAD_GATEWAY, json!({ "error": self.to_string() })),
        };

        (status, Json(body)).into_response()
    }
}

/// GET / - liveness message
pub async fn home() -> Json<Value> {
    Json(json!({ "message": "Trip Planner Crew API is running" }))
}

/// POST /api/trip-plan - run the trip crew for one request
pub async fn trip_plan(
    State(state): State<ApiState>,
    payload: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<TripPlan>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected trip plan body: {}", rejection.body_text());
        ApiError::InvalidJson(rejection.body_text())
    })?;
    request.validate()?;

    tracing::info!(
        origin = %request.origin,
        cities = ?request.cities,
        date_range = %request.date_range,
        "Planning trip"
    );

    let result = TripCrew::new(request, state.runtime.clone())
        .run()
        .await
        .map_err(|e| {
            tracing::error!("Trip crew failed: {}", e);
            e
        })?;

    Ok(Json(TripPlan { result }))
}

/// GET /api/agents - describe the crew's personas
pub async fn list_agents(State(state): State<ApiState>) -> Json<Vec<AgentInfo>> {
    Json(state.runtime.agent_infos())
}
