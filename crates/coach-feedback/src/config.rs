//! Pipeline and model-provider configuration.

use std::time::Duration;

use url::Url;

use crate::error::{FeedbackError, FeedbackResult};

/// Configuration for the OpenRouter-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Bearer key. `None` when not configured.
    pub api_key: Option<String>,
    /// API base URL (without `/chat/completions`)
    pub base_url: String,
    /// Vision-capable model identifier
    pub model: String,
    /// Sent as `HTTP-Referer` for provider attribution
    pub referer: String,
    /// Sent as `X-Title` for provider attribution
    pub title: String,
    /// Per-call request timeout
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "anthropic/claude-3.5-sonnet".to_string(),
            referer: "https://baseballtrainer.app".to_string(),
            title: "Baseball Trainer".to_string(),
            timeout: Duration::from_secs(30),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

impl OpenRouterConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("OPENROUTER_BASE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("OPENROUTER_MODEL").unwrap_or(defaults.model),
            referer: std::env::var("OPENROUTER_REFERER").unwrap_or(defaults.referer),
            title: std::env::var("OPENROUTER_TITLE").unwrap_or(defaults.title),
            timeout: Duration::from_secs(
                std::env::var("OPENROUTER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_tokens: std::env::var("FEEDBACK_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: std::env::var("FEEDBACK_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
        }
    }

    /// Check that the key is present and the base URL is usable.
    pub fn validate(&self) -> FeedbackResult<()> {
        if self.api_key.is_none() {
            return Err(FeedbackError::config(
                "OPENROUTER_API_KEY is not configured; set it in the environment to enable AI feedback",
            ));
        }
        let url = Url::parse(&self.base_url).map_err(|e| {
            FeedbackError::config(format!(
                "OPENROUTER_BASE_URL '{}' is not a valid URL: {}",
                self.base_url, e
            ))
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(FeedbackError::config(format!(
                "OPENROUTER_BASE_URL must be http(s), got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Full chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Retry and sampling limits for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Attempts before falling back
    pub max_attempts: u32,
    /// Pause between a rejected attempt and the next one
    pub retry_delay: Duration,
    /// Default frames per model call
    pub max_frames: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            max_frames: 6,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_attempts: std::env::var("FEEDBACK_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(3)
                .max(1),
            retry_delay: Duration::from_millis(
                std::env::var("FEEDBACK_RETRY_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
            max_frames: std::env::var("FEEDBACK_MAX_FRAMES")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(6)
                .max(1),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenRouterConfig::default();
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));

        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.max_attempts, 3);
        assert_eq!(pipeline.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_validate_requires_key() {
        let config = OpenRouterConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));

        let config = OpenRouterConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = OpenRouterConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FeedbackError::Config(_))));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let config = OpenRouterConfig {
            base_url: "http://localhost:9000/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_with_max_attempts_clamps() {
        assert_eq!(PipelineConfig::default().with_max_attempts(0).max_attempts, 1);
    }
}
