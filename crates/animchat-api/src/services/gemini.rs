//! Gemini client for structured (JSON schema) text generation.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::env_parse;
use crate::error::{LlmError, LlmResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Model used to refine the user's prompt
    pub refine_model: String,
    /// Model used to split the refined prompt into frames
    pub frames_model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            refine_model: "gemini-2.0-flash-001".to_string(),
            frames_model: "gemini-1.5-flash".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Create config from environment variables. `GEMINI_API_KEY` is required.
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".to_string()))?;

        let defaults = Self::new(api_key);
        Ok(Self {
            base_url: std::env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url.clone()),
            refine_model: std::env::var("GEMINI_REFINE_MODEL")
                .unwrap_or(defaults.refine_model.clone()),
            frames_model: std::env::var("GEMINI_FRAMES_MODEL")
                .unwrap_or(defaults.frames_model.clone()),
            timeout: env_parse("GEMINI_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            ..defaults
        })
    }
}

/// Gemini API request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> LlmResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> LlmResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Generate a JSON value constrained by `schema` and decode it into `T`.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        model: &str,
        system: &str,
        prompt: &str,
        schema: serde_json::Value,
    ) -> LlmResult<T> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let request = GeminiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        debug!(model = %model, "Sending Gemini generateContent request");

        let response = self
            .http
            .post(&url)
            // Header rather than `?key=`: reqwest errors print the request URL.
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::invalid_response(format!("Failed to parse Gemini response: {}", e)))?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        serde_json::from_str(strip_code_fences(text))
            .map_err(|e| LlmError::invalid_response(format!("Response did not match schema: {}", e)))
    }
}

/// Strip a surrounding markdown code block, if any.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.refine_model, "gemini-2.0-flash-001");
        assert_eq!(config.frames_model, "gemini-1.5-flash");
    }

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: "sys" }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: serde_json::json!({"type": "STRING"}),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }
}
