//! Feedback pipeline error types.

use thiserror::Error;

pub type FeedbackResult<T> = Result<T, FeedbackError>;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited by model provider: {0}")]
    RateLimited(String),

    #[error("Model provider error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model response had no content")]
    EmptyResponse,

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Feedback generation cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedbackError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a non-success HTTP status from the model provider.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            429 => Self::RateLimited(body),
            500..=599 => Self::ServerError(status, body),
            _ => Self::RequestFailed(format!("HTTP {}: {}", status, body)),
        }
    }

    /// Whether a later attempt has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FeedbackError::RateLimited(_)
                | FeedbackError::ServerError(..)
                | FeedbackError::Timeout(_)
                | FeedbackError::Network(_)
                | FeedbackError::EmptyResponse
        )
    }
}
