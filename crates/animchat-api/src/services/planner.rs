//! Animation planning: prompt refinement and frame decomposition.
//!
//! The [`AnimationPlanner`] trait is the seam between the pipeline and the
//! text-generation provider; [`GeminiPlanner`] is the production
//! implementation.

use animchat_models::{FramePrompt, Prompt, RefinedPrompt, MAX_SUGGESTED_FRAMES};
use async_trait::async_trait;
use serde_json::json;

use crate::error::LlmResult;
use crate::services::gemini::GeminiClient;

/// Produces refined prompts and per-frame instructions.
#[async_trait]
pub trait AnimationPlanner: Send + Sync {
    /// Expand the user's prompt into a detailed animation instruction.
    ///
    /// When `with_frames` is set the result also carries a suggested frame
    /// count.
    async fn refine(&self, prompt: &Prompt, with_frames: bool) -> LlmResult<RefinedPrompt>;

    /// Split a refined prompt into `frame_count` ordered frame instructions.
    ///
    /// The count is a request to the model, not a guarantee.
    async fn split_frames(
        &self,
        refined: &RefinedPrompt,
        frame_count: u32,
    ) -> LlmResult<Vec<FramePrompt>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Gemini-backed planner.
pub struct GeminiPlanner {
    client: GeminiClient,
}

impl GeminiPlanner {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnimationPlanner for GeminiPlanner {
    async fn refine(&self, prompt: &Prompt, with_frames: bool) -> LlmResult<RefinedPrompt> {
        let system = if with_frames {
            refine_with_frames_instruction()
        } else {
            REFINE_INSTRUCTION.to_string()
        };

        self.client
            .generate_json(
                &self.client.config().refine_model,
                &system,
                prompt.as_str(),
                refine_schema(with_frames),
            )
            .await
    }

    async fn split_frames(
        &self,
        refined: &RefinedPrompt,
        frame_count: u32,
    ) -> LlmResult<Vec<FramePrompt>> {
        self.client
            .generate_json(
                &self.client.config().frames_model,
                &frames_instruction(frame_count),
                &build_frames_prompt(refined.text(), frame_count),
                frames_schema(),
            )
            .await
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

const REFINE_INSTRUCTION: &str = r#"You are an expert mathematical animator who works with the Manim library. Rewrite the user's request as a clear, detailed instruction for producing a Manim animation.

Expand short requests with Manim-specific vocabulary (MathTex, Axes, ParametricFunction, Create, Write, Transform, FadeIn), LaTeX notation for every formula, and concrete guidance on layout, colours and pacing.

Example:
User input: "explain the pythagorean theorem"
Refined output: "Animate a right triangle with legs a and b and hypotenuse c. Write a^2 + b^2 = c^2 with MathTex above it. Grow a square on each side, colour them RED, GREEN and BLUE, then Transform the two smaller squares into the larger one to show the areas are equal.""#;

fn refine_with_frames_instruction() -> String {
    format!(
        r#"{REFINE_INSTRUCTION}

A frame is one self-contained visual step of the explanation: the largest group of objects and animations that belong together before the scene moves on. Also decide how many frames the animation needs, between 1 and {MAX_SUGGESTED_FRAMES}."#
    )
}

fn frames_instruction(frame_count: u32) -> String {
    format!(
        r#"You are an expert Manim programmer splitting a planned animation into sequential frame instructions. Each instruction is handed to a code generator that only sees that one frame, so it must be complete on its own.

Be concrete about:
- Manim objects (Circle, Square, MathTex, Axes, NumberPlane, Graph)
- Animation methods (Create, Write, FadeIn, Transform, ReplacementTransform)
- Colours (RED, BLUE, gradients), positions and transformations
- Camera movement, zoom, durations and timing

You MUST return exactly {frame_count} frame instructions, in playback order."#
    )
}

fn build_frames_prompt(refined: &str, frame_count: u32) -> String {
    format!(
        r#"Split the following animation into exactly {frame_count} sequential frames, with specific Manim instructions for each frame:

{refined}

Return an array of exactly {frame_count} items, no more and no fewer.

Example item: "Create a MathTex object for x = \frac{{-b \pm \sqrt{{b^2-4ac}}}}{{2a}} and FadeIn it at the centre. Colour the discriminant b^2-4ac YELLOW and add a short Text label below explaining that its sign decides the number of real roots.""#
    )
}

/// Response schema for the refinement call.
fn refine_schema(with_frames: bool) -> serde_json::Value {
    let mut schema = json!({
        "type": "OBJECT",
        "properties": {
            "refinedPrompt": {
                "type": "STRING",
                "description": "Refined prompt"
            }
        },
        "required": ["refinedPrompt"]
    });

    if with_frames {
        schema["properties"]["frames"] = json!({
            "type": "INTEGER",
            "description": format!(
                "Number of frames needed to complete the animation (not more than {})",
                MAX_SUGGESTED_FRAMES
            )
        });
        schema["required"] = json!(["refinedPrompt", "frames"]);
    }

    schema
}

/// Response schema for the frame decomposition call.
fn frames_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "prompt": {
                    "type": "STRING",
                    "description": "Instruction for writing the code of this frame only"
                }
            },
            "required": ["prompt"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_schema_frames_field() {
        let single = refine_schema(false);
        assert!(single["properties"].get("frames").is_none());
        assert_eq!(single["required"], json!(["refinedPrompt"]));

        let multi = refine_schema(true);
        assert_eq!(multi["properties"]["frames"]["type"], "INTEGER");
        assert_eq!(multi["required"], json!(["refinedPrompt", "frames"]));
    }

    #[test]
    fn test_frames_prompt_mentions_count() {
        let prompt = build_frames_prompt("Draw a unit circle", 4);
        assert!(prompt.contains("exactly 4 sequential frames"));
        assert!(prompt.contains("Draw a unit circle"));
        assert!(prompt.contains(r"\frac{-b \pm \sqrt{b^2-4ac}}{2a}"));
        assert!(frames_instruction(4).contains("exactly 4 frame instructions"));
    }

    #[test]
    fn test_frames_instruction_bound() {
        assert!(refine_with_frames_instruction().contains("between 1 and 5"));
    }
}
