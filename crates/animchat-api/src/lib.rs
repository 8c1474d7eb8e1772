//! Axum HTTP API server for animation chat.
//!
//! This crate provides:
//! - `POST /api/chat`, which refines a prompt with Gemini, splits it into
//!   frames and renders each frame through an external Manim backend
//! - Per-IP rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, PipelineConfig, PipelineMode, RenderStrategy};
pub use error::{ApiError, ApiResult, LlmError, PipelineError, RenderError};
pub use routes::create_router;
pub use services::{AnimationPipeline, AnimationPlanner, RenderBackend};
pub use state::AppState;
