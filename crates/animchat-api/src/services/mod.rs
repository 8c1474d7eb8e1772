//! Business logic services.

pub mod gemini;
pub mod pipeline;
pub mod planner;
pub mod renderer;

pub use gemini::{GeminiClient, GeminiConfig};
pub use pipeline::AnimationPipeline;
pub use planner::{AnimationPlanner, GeminiPlanner};
pub use renderer::{HttpRenderClient, RenderBackend, RenderConfig};
