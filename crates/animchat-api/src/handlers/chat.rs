//! Chat handler: runs the animation pipeline for one prompt.

use animchat_models::{ChatRequest, ChatResponse, Prompt};
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /api/chat`
///
/// The body is parsed as JSON whatever its `Content-Type`. Malformed bodies
/// are reported like any other fatal error (500).
pub async fn chat(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<ChatResponse>> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Failed to parse chat request body");
        ApiError::internal(e.to_string())
    })?;

    let prompt = Prompt::new(request.prompt).map_err(|e| ApiError::bad_request(e.to_string()))?;
    info!(prompt = %prompt.preview(50), "Received prompt");

    match state.pipeline.generate_animation(&prompt).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!(stage = e.stage(), error = %e, "Chat request failed");
            Err(e.into())
        }
    }
}
