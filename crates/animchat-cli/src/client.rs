//! HTTP client for the chat endpoint.

use std::time::Duration;

use animchat_models::{ChatRequest, ChatResponse, ErrorResponse};
use reqwest::Client;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Configuration for the chat client.
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// Base URL of the API server
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(600), // multi-frame renders take minutes
        }
    }
}

impl ChatClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("ANIMCHAT_API_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("ANIMCHAT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Client for `POST /api/chat`.
pub struct ChatApiClient {
    http: Client,
    config: ChatClientConfig,
}

impl ChatApiClient {
    pub fn new(config: ChatClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send a prompt and return every video link in the reply.
    pub async fn send(&self, prompt: &str) -> ClientResult<Vec<String>> {
        let url = format!("{}/api/chat", self.config.base_url.trim_end_matches('/'));
        debug!(url = %url, "Sending chat request");

        let response = self
            .http
            .post(&url)
            .json(&ChatRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(reply.into_links())
    }
}
