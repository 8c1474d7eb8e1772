//! Shared data models for AnimChat.
//!
//! This crate provides Serde-serializable types for:
//! - User prompts, refined prompts and frame prompts
//! - Per-frame render outcomes and their aggregation
//! - Chat messages, the transcript and the input draft
//! - Chat API request/response schemas
//! - Video URL classification

pub mod api;
pub mod frame;
pub mod input;
pub mod message;
pub mod prompt;
pub mod utils;

// Re-export common types
pub use api::{ChatRequest, ChatResponse, ErrorResponse};
pub use frame::{collect_links, FrameOutcome};
pub use input::{Attachment, ChatInput, Key, Submission};
pub use message::{Message, Role, Transcript, GENERIC_ERROR_MESSAGE};
pub use prompt::{FramePrompt, Prompt, PromptError, RefinedPrompt, MAX_SUGGESTED_FRAMES};
pub use utils::is_video_url;
