//! Application state.

use std::sync::Arc;

use crate::config::{ApiConfig, PipelineConfig};
use crate::services::{
    AnimationPipeline, GeminiClient, GeminiPlanner, HttpRenderClient,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<AnimationPipeline>,
}

impl AppState {
    /// Create state around an already-built pipeline.
    pub fn new(config: ApiConfig, pipeline: AnimationPipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Build the production pipeline (Gemini planner, HTTP renderer) from
    /// environment variables.
    pub fn from_env(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let pipeline_config = PipelineConfig::from_env()?;
        let gemini = GeminiClient::from_env()?;
        let renderer = HttpRenderClient::from_env()?;

        let pipeline = AnimationPipeline::new(
            Arc::new(GeminiPlanner::new(gemini)),
            Arc::new(renderer),
            pipeline_config,
        );

        Ok(Self::new(config, pipeline))
    }
}
