//! Health check handler.

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Response body for health checks.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub model: String,
}

/// Report daemon liveness.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        model: state.model.name().to_string(),
    })
}
