//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub pipeline_mode: String,
    pub render_strategy: String,
}

/// Health check endpoint (liveness probe).
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.pipeline.config();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        pipeline_mode: format!("{:?}", config.mode),
        render_strategy: config.render_strategy.name().to_string(),
    })
}
