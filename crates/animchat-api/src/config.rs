//! API configuration.

use std::str::FromStr;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second (per client IP)
    pub rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            max_body_size: 10 * 1024 * 1024, // 10MB
            metrics_enabled: true,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: env_parse("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

/// Which pipeline variant serves chat requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineMode {
    /// Refine once, render the refined prompt, return `{url}`
    SingleFrame,
    /// Refine with a frame count, split into frames, return `{links}`
    #[default]
    MultiFrame,
}

impl FromStr for PipelineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "single" | "single_frame" => Ok(PipelineMode::SingleFrame),
            "multi" | "multi_frame" => Ok(PipelineMode::MultiFrame),
            other => Err(format!("unknown pipeline mode: {}", other)),
        }
    }
}

/// How frame prompts are sent to the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// One call at a time, pausing `delay` between consecutive calls
    Sequential { delay: Duration },
    /// All calls issued together; `max_in_flight` caps concurrency when set
    Parallel { max_in_flight: Option<usize> },
}

impl Default for RenderStrategy {
    fn default() -> Self {
        RenderStrategy::Sequential {
            delay: Duration::from_secs(1),
        }
    }
}

impl RenderStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            RenderStrategy::Sequential { .. } => "sequential",
            RenderStrategy::Parallel { .. } => "parallel",
        }
    }
}

/// Orchestration pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub mode: PipelineMode,
    pub render_strategy: RenderStrategy,
}

impl PipelineConfig {
    /// Create config from environment variables.
    ///
    /// Unknown `PIPELINE_MODE` / `RENDER_STRATEGY` values are rejected rather
    /// than silently replaced by a default.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("PIPELINE_MODE") {
            Some(v) => v.parse()?,
            None => PipelineMode::default(),
        };

        let strategy = lookup("RENDER_STRATEGY").unwrap_or_else(|| "sequential".to_string());
        let render_strategy = match strategy.trim().to_lowercase().as_str() {
            "sequential" => RenderStrategy::Sequential {
                delay: Duration::from_millis(parse_with(&lookup, "RENDER_DELAY_MS").unwrap_or(1000)),
            },
            // Zero means no cap.
            "parallel" => RenderStrategy::Parallel {
                max_in_flight: parse_with::<usize, _>(&lookup, "RENDER_MAX_PARALLEL").filter(|n| *n > 0),
            },
            other => return Err(format!("unknown render strategy: {}", other)),
        };

        Ok(Self {
            mode,
            render_strategy,
        })
    }
}

/// Parse an environment variable, treating missing or malformed values as unset.
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    parse_with(&|key: &str| std::env::var(key).ok(), key)
}

fn parse_with<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert!(!config.is_production());

        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.mode, PipelineMode::MultiFrame);
        assert_eq!(
            pipeline.render_strategy,
            RenderStrategy::Sequential {
                delay: Duration::from_secs(1)
            }
        );
    }

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_pipeline_config_defaults_when_unset() {
        let config = PipelineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.mode, PipelineMode::MultiFrame);
        assert_eq!(config.render_strategy, RenderStrategy::default());
    }

    #[test]
    fn test_pipeline_config_sequential_delay() {
        let config = PipelineConfig::from_lookup(lookup(&[
            ("PIPELINE_MODE", "single_frame"),
            ("RENDER_STRATEGY", "Sequential"),
            ("RENDER_DELAY_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.mode, PipelineMode::SingleFrame);
        assert_eq!(
            config.render_strategy,
            RenderStrategy::Sequential {
                delay: Duration::from_millis(250)
            }
        );

        // Malformed delay falls back to the default pause
        let config = PipelineConfig::from_lookup(lookup(&[("RENDER_DELAY_MS", "soon")])).unwrap();
        assert_eq!(
            config.render_strategy,
            RenderStrategy::Sequential {
                delay: Duration::from_secs(1)
            }
        );
    }

    #[test]
    fn test_pipeline_config_parallel_cap() {
        let capped = PipelineConfig::from_lookup(lookup(&[
            ("RENDER_STRATEGY", "parallel"),
            ("RENDER_MAX_PARALLEL", "3"),
        ]))
        .unwrap();
        assert_eq!(
            capped.render_strategy,
            RenderStrategy::Parallel {
                max_in_flight: Some(3)
            }
        );

        for max in ["0", ""] {
            let uncapped = PipelineConfig::from_lookup(lookup(&[
                ("RENDER_STRATEGY", "parallel"),
                ("RENDER_MAX_PARALLEL", max),
            ]))
            .unwrap();
            assert_eq!(
                uncapped.render_strategy,
                RenderStrategy::Parallel { max_in_flight: None }
            );
        }
    }

    #[test]
    fn test_pipeline_config_rejects_unknown_values() {
        let err = PipelineConfig::from_lookup(lookup(&[("RENDER_STRATEGY", "burst")])).unwrap_err();
        assert_eq!(err, "unknown render strategy: burst");

        assert!(PipelineConfig::from_lookup(lookup(&[("PIPELINE_MODE", "frames")])).is_err());
    }

    #[test]
    fn test_pipeline_mode_parse() {
        assert_eq!("single".parse::<PipelineMode>(), Ok(PipelineMode::SingleFrame));
        assert_eq!("Multi-Frame".parse::<PipelineMode>(), Ok(PipelineMode::MultiFrame));
        assert!("frames".parse::<PipelineMode>().is_err());
    }
}
