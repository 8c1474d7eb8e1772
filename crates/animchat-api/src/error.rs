//! API error types.

use animchat_models::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;
pub type LlmResult<T> = Result<T, LlmError>;
pub type RenderResult<T> = Result<T, RenderError>;
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors from the text-generation provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM not configured: {0}")]
    NotConfigured(String),

    #[error("LLM request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("LLM returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response had no content")]
    EmptyResponse,

    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

/// Errors from a single render-backend call.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Render backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid render response: {0}")]
    InvalidResponse(String),
}

/// Terminal failures of one animation request.
///
/// Per-frame render failures in the multi-frame variant are not represented
/// here; they are recorded as failed frame outcomes and dropped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Prompt refinement failed: {0}")]
    Refinement(#[source] LlmError),

    #[error("Frame generation failed: {0}")]
    FrameGeneration(#[source] LlmError),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl PipelineError {
    /// Stage label used in logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Refinement(_) => "refinement",
            PipelineError::FrameGeneration(_) => "frame_generation",
            PipelineError::Render(_) => "render",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to clients. Stage failures use fixed strings so that
    /// upstream details never leak into responses.
    fn public_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            ApiError::Pipeline(err) => match err {
                PipelineError::Refinement(_) => "Failed to refine prompt".to_string(),
                PipelineError::FrameGeneration(_) => "Failed to generate frame prompts".to_string(),
                PipelineError::Render(_) => "Failed to generate animation".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(self.public_message());

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_errors_map_to_500() {
        let cases = [
            (
                ApiError::from(PipelineError::Refinement(LlmError::EmptyResponse)),
                "Failed to refine prompt",
            ),
            (
                ApiError::from(PipelineError::FrameGeneration(LlmError::EmptyResponse)),
                "Failed to generate frame prompts",
            ),
            (
                ApiError::from(PipelineError::Render("no url".into())),
                "Failed to generate animation",
            ),
            (ApiError::internal("bad json"), "Internal server error"),
        ];

        for (err, message) in cases {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.public_message(), message);
        }
    }

    #[test]
    fn test_bad_request_keeps_message() {
        let err = ApiError::bad_request("Prompt must not be empty");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Prompt must not be empty");
    }

    #[test]
    fn test_pipeline_stage_labels() {
        assert_eq!(
            PipelineError::FrameGeneration(LlmError::invalid_response("x")).stage(),
            "frame_generation"
        );
    }
}
