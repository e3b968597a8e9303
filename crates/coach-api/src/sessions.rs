//! Session store.
//!
//! Sessions live in the backend gateway. This service reads them through the
//! gateway's internal REST API and writes generated feedback back.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;
use tracing::debug;

use coach_models::{FeedbackResponse, Session};

use crate::config::SessionStoreConfig;
use crate::error::UpstreamError;

const SERVICE: &str = "session store";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session, `None` when it does not exist.
    async fn get(&self, session_id: &str) -> Result<Option<Session>, UpstreamError>;

    /// Persist generated feedback on a session.
    async fn save_feedback(
        &self,
        session_id: &str,
        feedback: &FeedbackResponse,
    ) -> Result<(), UpstreamError>;
}

/// Gateway-backed session store.
#[derive(Clone)]
pub struct HttpSessionStore {
    http: Client,
    base_url: String,
}

impl HttpSessionStore {
    pub fn new(base_url: impl Into<String>, config: &SessionStoreConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL of one session, `None` for ids that cannot name a single path segment.
    fn session_url(&self, session_id: &str) -> Option<String> {
        if matches!(session_id, "" | "." | "..") {
            return None;
        }
        Some(format!(
            "{}/internal/sessions/{}",
            self.base_url,
            urlencoding::encode(session_id)
        ))
    }
}

#[async_trait]
impl SessionStore for HttpSessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, UpstreamError> {
        let Some(url) = self.session_url(session_id) else {
            debug!(session_id, "Rejected malformed session id");
            return Ok(None);
        };

        let response = self
            .http
            .get(url)
            .header("X-Internal-Request", "true")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(session_id, "Session not found");
                Ok(None)
            }
            status if status.is_success() => {
                let session = response
                    .json::<Session>()
                    .await
                    .map_err(|e| UpstreamError::invalid_response(SERVICE, e.to_string()))?;
                Ok(Some(session))
            }
            status => Err(UpstreamError::unavailable(
                SERVICE,
                format!("HTTP {}", status.as_u16()),
            )),
        }
    }

    async fn save_feedback(
        &self,
        session_id: &str,
        feedback: &FeedbackResponse,
    ) -> Result<(), UpstreamError> {
        let url = self
            .session_url(session_id)
            .ok_or_else(|| UpstreamError::invalid_response(SERVICE, "malformed session id"))?;

        let response = self
            .http
            .put(format!("{}/feedback", url))
            .header("X-Internal-Request", "true")
            .json(feedback)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::unavailable(
                SERVICE,
                format!("HTTP {}", status.as_u16()),
            ));
        }
        Ok(())
    }
}

/// In-memory session store for tests and local development.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Session) {
        self.sessions.write().await.insert(session.id.clone(), session);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, UpstreamError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn save_feedback(
        &self,
        session_id: &str,
        feedback: &FeedbackResponse,
    ) -> Result<(), UpstreamError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| UpstreamError::invalid_response(SERVICE, "unknown session"))?;
        session.feedback = Some(feedback.clone());
        Ok(())
    }
}
