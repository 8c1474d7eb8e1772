//! Prompt models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the frame count the refinement model is asked for.
///
/// Advisory only: the model may return more and the pipeline accepts it.
pub const MAX_SUGGESTED_FRAMES: u32 = 5;

/// Errors raised while validating a raw prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Prompt must not be empty")]
    Empty,
}

/// Raw text supplied by the end user.
///
/// Deserialization goes through [`Prompt::new`], so a blank prompt never
/// exists as a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt(String);

impl Prompt {
    /// Validate and wrap user text. Only whitespace-only input is rejected.
    pub fn new(text: impl Into<String>) -> Result<Self, PromptError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PromptError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines.
    pub fn preview(&self, max_chars: usize) -> String {
        preview(&self.0, max_chars)
    }
}

impl TryFrom<String> for Prompt {
    type Error = PromptError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl From<Prompt> for String {
    fn from(prompt: Prompt) -> Self {
        prompt.0
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// LLM-expanded version of the user's request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefinedPrompt {
    /// Refined instruction text
    pub refined_prompt: String,

    /// Number of frames the model thinks the animation needs
    #[serde(default, rename = "frames", skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<u32>,
}

impl RefinedPrompt {
    pub fn new(text: impl Into<String>, frame_count: Option<u32>) -> Self {
        Self {
            refined_prompt: text.into(),
            frame_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.refined_prompt
    }

    /// Whether the suggested frame count exceeds the advisory bound.
    pub fn exceeds_suggested_frames(&self) -> bool {
        self.frame_count
            .map(|n| n > MAX_SUGGESTED_FRAMES)
            .unwrap_or(false)
    }
}

/// Instruction for a single animation segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FramePrompt {
    /// The prompt required to write the code for this frame only
    pub prompt: String,
}

impl FramePrompt {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_rejects_blank() {
        assert_eq!(Prompt::new(""), Err(PromptError::Empty));
        assert_eq!(Prompt::new("  \n\t"), Err(PromptError::Empty));
        assert_eq!(Prompt::new(" circle ").unwrap().as_str(), " circle ");
    }

    #[test]
    fn test_prompt_deserialize_validates() {
        let prompt: Prompt = serde_json::from_str(r#""draw a circle""#).unwrap();
        assert_eq!(prompt.as_str(), "draw a circle");
        assert_eq!(serde_json::to_string(&prompt).unwrap(), r#""draw a circle""#);

        let err = serde_json::from_str::<Prompt>(r#""   ""#).unwrap_err();
        assert!(err.to_string().contains("Prompt must not be empty"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let prompt = Prompt::new("ax² + bx + c = 0").unwrap();
        assert_eq!(prompt.preview(3), "ax²...");
        assert_eq!(prompt.preview(100), "ax² + bx + c = 0");
    }

    #[test]
    fn test_refined_prompt_wire_names() {
        let refined: RefinedPrompt =
            serde_json::from_str(r#"{"refinedPrompt":"Draw a circle","frames":3}"#).unwrap();
        assert_eq!(refined.text(), "Draw a circle");
        assert_eq!(refined.frame_count, Some(3));

        let single: RefinedPrompt = serde_json::from_str(r#"{"refinedPrompt":"x"}"#).unwrap();
        assert_eq!(single.frame_count, None);
    }

    #[test]
    fn test_exceeds_suggested_frames() {
        assert!(!RefinedPrompt::new("a", Some(5)).exceeds_suggested_frames());
        assert!(RefinedPrompt::new("a", Some(6)).exceeds_suggested_frames());
        assert!(!RefinedPrompt::new("a", None).exceeds_suggested_frames());
    }
}
