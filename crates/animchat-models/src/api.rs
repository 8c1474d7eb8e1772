//! Chat API wire types.
//!
//! These mirror the JSON accepted and produced by `POST /api/chat`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatRequest {
    pub prompt: String,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Successful chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ChatResponse {
    /// Single-frame pipeline result
    Single { url: String },
    /// Multi-frame pipeline result; may be shorter than the frame count
    Frames { links: Vec<String> },
}

impl ChatResponse {
    /// All video links in response order.
    pub fn links(&self) -> Vec<&str> {
        match self {
            ChatResponse::Single { url } => vec![url.as_str()],
            ChatResponse::Frames { links } => links.iter().map(String::as_str).collect(),
        }
    }

    pub fn into_links(self) -> Vec<String> {
        match self {
            ChatResponse::Single { url } => vec![url],
            ChatResponse::Frames { links } => links,
        }
    }
}

/// Uniform error body for every failure class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_response_shapes() {
        let single = ChatResponse::Single {
            url: "https://x/v.mp4".to_string(),
        };
        assert_eq!(serde_json::to_value(&single).unwrap(), json!({"url": "https://x/v.mp4"}));

        let frames: ChatResponse = serde_json::from_value(json!({"links": ["a", "b"]})).unwrap();
        assert_eq!(frames.links(), vec!["a", "b"]);

        let empty: ChatResponse = serde_json::from_value(json!({"links": []})).unwrap();
        assert!(empty.into_links().is_empty());
    }

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("Failed to refine prompt")).unwrap();
        assert_eq!(body, json!({"error": "Failed to refine prompt"}));
    }

    #[test]
    fn test_chat_response_schema_lists_both_shapes() {
        let schema = serde_json::to_value(schemars::schema_for!(ChatResponse)).unwrap();
        let variants = schema["anyOf"].as_array().unwrap();
        assert_eq!(variants.len(), 2);
    }
}
