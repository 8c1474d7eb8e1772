//! Animation orchestration pipeline.
//!
//! One request flows through: refine → (multi-frame) split into frames →
//! render each frame → aggregate. Every external call is made exactly once.

use std::sync::Arc;
use std::time::Instant;

use animchat_models::{collect_links, ChatResponse, FrameOutcome, FramePrompt, Prompt, RefinedPrompt};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::{PipelineConfig, PipelineMode, RenderStrategy};
use crate::error::{LlmError, PipelineError, PipelineResult};
use crate::metrics;
use crate::services::planner::AnimationPlanner;
use crate::services::renderer::RenderBackend;

/// Coordinates the planner and the render backend for chat requests.
pub struct AnimationPipeline {
    planner: Arc<dyn AnimationPlanner>,
    renderer: Arc<dyn RenderBackend>,
    config: PipelineConfig,
}

impl AnimationPipeline {
    pub fn new(
        planner: Arc<dyn AnimationPlanner>,
        renderer: Arc<dyn RenderBackend>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            planner,
            renderer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the configured pipeline variant for one prompt.
    pub async fn generate_animation(&self, prompt: &Prompt) -> PipelineResult<ChatResponse> {
        info!(
            mode = ?self.config.mode,
            prompt = %prompt.preview(50),
            "Starting animation pipeline"
        );

        let result = match self.config.mode {
            PipelineMode::SingleFrame => self.run_single(prompt).await,
            PipelineMode::MultiFrame => self.run_multi(prompt).await,
        };

        match &result {
            Ok(response) => metrics::record_pipeline_outcome("success", response.links().len()),
            Err(e) => metrics::record_pipeline_outcome(e.stage(), 0),
        }

        result
    }

    async fn run_single(&self, prompt: &Prompt) -> PipelineResult<ChatResponse> {
        let refined = self.refine(prompt, false).await?;

        match self.render_frame(0, 1, refined.text()).await {
            FrameOutcome::Rendered { url, .. } => Ok(ChatResponse::Single { url }),
            FrameOutcome::Failed { reason, .. } => Err(PipelineError::Render(reason)),
        }
    }

    async fn run_multi(&self, prompt: &Prompt) -> PipelineResult<ChatResponse> {
        let refined = self.refine(prompt, true).await?;

        let frame_count = refined.frame_count.ok_or_else(|| {
            PipelineError::Refinement(LlmError::invalid_response("refinement returned no frame count"))
        })?;
        if refined.exceeds_suggested_frames() {
            warn!(frame_count, "Refinement suggested more frames than advised");
        }

        let frames = self.split_frames(&refined, frame_count).await?;
        let outcomes = self.render_frames(&frames).await;
        let links = collect_links(&outcomes);

        info!(
            requested = frames.len(),
            rendered = links.len(),
            "Generated video links"
        );

        Ok(ChatResponse::Frames { links })
    }

    async fn refine(&self, prompt: &Prompt, with_frames: bool) -> PipelineResult<RefinedPrompt> {
        let start = Instant::now();
        let result = self.planner.refine(prompt, with_frames).await;
        metrics::record_llm_call("refine", result.is_ok(), start.elapsed().as_secs_f64());

        match result {
            Ok(refined) => {
                info!(
                    planner = self.planner.name(),
                    frame_count = ?refined.frame_count,
                    "Refined prompt"
                );
                Ok(refined)
            }
            Err(e) => {
                warn!(planner = self.planner.name(), error = %e, "Prompt refinement failed");
                Err(PipelineError::Refinement(e))
            }
        }
    }

    async fn split_frames(
        &self,
        refined: &RefinedPrompt,
        frame_count: u32,
    ) -> PipelineResult<Vec<FramePrompt>> {
        let start = Instant::now();
        let result = self.planner.split_frames(refined, frame_count).await;
        metrics::record_llm_call("split_frames", result.is_ok(), start.elapsed().as_secs_f64());

        let frames = result.map_err(|e| {
            warn!(planner = self.planner.name(), error = %e, "Frame generation failed");
            PipelineError::FrameGeneration(e)
        })?;

        if frames.len() != frame_count as usize {
            warn!(
                requested = frame_count,
                received = frames.len(),
                "Frame count mismatch, continuing with received frames"
            );
        } else {
            info!(count = frames.len(), "Generated frame prompts");
        }

        Ok(frames)
    }

    /// Render every frame with the configured strategy. Always returns one
    /// outcome per frame, in frame order.
    pub async fn render_frames(&self, frames: &[FramePrompt]) -> Vec<FrameOutcome> {
        let total = frames.len();

        match self.config.render_strategy {
            RenderStrategy::Sequential { delay } => {
                let mut outcomes = Vec::with_capacity(total);
                for (index, frame) in frames.iter().enumerate() {
                    if index > 0 && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    outcomes.push(self.render_frame(index, total, &frame.prompt).await);
                }
                outcomes
            }
            RenderStrategy::Parallel { max_in_flight } => {
                let semaphore = max_in_flight.map(Semaphore::new);
                let semaphore = semaphore.as_ref();

                let futures = frames.iter().enumerate().map(|(index, frame)| async move {
                    // The semaphore is never closed, so acquire cannot fail.
                    let _permit = match semaphore {
                        Some(s) => s.acquire().await.ok(),
                        None => None,
                    };
                    self.render_frame(index, total, &frame.prompt).await
                });

                join_all(futures).await
            }
        }
    }

    /// Render a single frame; failures are contained in the outcome.
    async fn render_frame(&self, index: usize, total: usize, prompt: &str) -> FrameOutcome {
        info!(frame = index + 1, total, "Rendering frame");

        let outcome = match self.renderer.render(prompt).await {
            Ok(Some(url)) => {
                info!(frame = index + 1, url = %url, "Frame rendered");
                FrameOutcome::rendered(index, url)
            }
            Ok(None) => {
                warn!(frame = index + 1, "Render backend returned no url");
                FrameOutcome::failed(index, "render backend returned no url")
            }
            Err(e) => {
                warn!(frame = index + 1, backend = self.renderer.name(), error = %e, "Frame render failed");
                FrameOutcome::failed(index, e.to_string())
            }
        };

        metrics::record_frame_outcome(&outcome);
        outcome
    }
}
