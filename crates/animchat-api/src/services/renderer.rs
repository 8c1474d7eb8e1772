//! Render backend HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::env_parse;
use crate::error::{RenderError, RenderResult};

/// Configuration for the render client.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Endpoint that accepts `{ "prompt": ... }`
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            url: "https://manim-ai.vercel.app/api/generate".to_string(),
            timeout: Duration::from_secs(300), // rendering is slow
        }
    }
}

impl RenderConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("RENDER_URL").unwrap_or(defaults.url),
            timeout: env_parse("RENDER_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Turns a single instruction into a video.
#[async_trait]
pub trait RenderBackend: Send + Sync {
    /// Render one instruction.
    ///
    /// `Ok(None)` means the backend accepted the call but returned no URL.
    async fn render(&self, prompt: &str) -> RenderResult<Option<String>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    #[serde(default)]
    url: Option<String>,
}

/// Client for the remote Manim render endpoint.
pub struct HttpRenderClient {
    http: Client,
    config: RenderConfig,
}

impl HttpRenderClient {
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> RenderResult<Self> {
        Self::new(RenderConfig::from_env())
    }
}

#[async_trait]
impl RenderBackend for HttpRenderClient {
    async fn render(&self, prompt: &str) -> RenderResult<Option<String>> {
        debug!(url = %self.config.url, "Sending render request");

        let response = self
            .http
            .post(&self.config.url)
            .json(&RenderRequest { prompt })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Status { status, body });
        }

        let body: RenderResponse = response
            .json()
            .await
            .map_err(|e| RenderError::InvalidResponse(e.to_string()))?;

        Ok(body.url.filter(|u| !u.trim().is_empty()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.url, "https://manim-ai.vercel.app/api/generate");
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_response_without_url() {
        let body: RenderResponse = serde_json::from_str(r#"{"status":"queued"}"#).unwrap();
        assert!(body.url.is_none());
    }
}
