//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use coach_feedback::{
    FeedbackError, FeedbackPipeline, FeedbackValidator, GenericityLexicon, OpenRouterClient,
    PipelineConfig, PromptEscalator,
};

use crate::auth::JwtVerifier;
use crate::config::{ApiConfig, SessionStoreConfig};
use crate::frames::{FrameSource, HttpFrameSource};
use crate::sessions::{HttpSessionStore, MemorySessionStore, SessionStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    /// Feedback pipeline, or the configuration problem that prevents building it.
    pub pipeline: Result<FeedbackPipeline, String>,
    pub sessions: Arc<dyn SessionStore>,
    pub frames: Arc<dyn FrameSource>,
    pub auth: Arc<JwtVerifier>,
}

impl AppState {
    /// Create new application state.
    ///
    /// A missing model key does not fail startup; feedback requests report it
    /// and `/ready` stays unavailable until it is configured.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let auth = JwtVerifier::from_env()?;

        let pipeline = match OpenRouterClient::from_env() {
            Ok(client) => {
                let lexicon = GenericityLexicon::from_env()?;
                let pipeline_config = PipelineConfig::from_env();
                let model = client.config().model.clone();
                // A lexicon that rejects the fallback is a startup error.
                let pipeline = FeedbackPipeline::new(
                    Arc::new(client),
                    PromptEscalator::default(),
                    FeedbackValidator::new(lexicon),
                    pipeline_config,
                )?;
                info!(
                    model = %model,
                    max_attempts = pipeline.config().max_attempts,
                    max_frames = pipeline.config().max_frames,
                    "Feedback pipeline configured"
                );
                Ok(pipeline)
            }
            Err(FeedbackError::Config(msg)) => {
                warn!("Feedback pipeline disabled: {}", msg);
                Err(msg)
            }
            Err(e) => return Err(e.into()),
        };

        let store_config = SessionStoreConfig::from_env();
        let sessions: Arc<dyn SessionStore> = match &store_config.base_url {
            Some(url) => Arc::new(HttpSessionStore::new(url.clone(), &store_config)?),
            None => {
                warn!("SESSION_API_URL not set, using in-memory session store");
                Arc::new(MemorySessionStore::new())
            }
        };

        let frames = HttpFrameSource::from_env()?;

        Ok(Self {
            config,
            pipeline,
            sessions,
            frames: Arc::new(frames),
            auth: Arc::new(auth),
        })
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(
        config: ApiConfig,
        pipeline: Result<FeedbackPipeline, String>,
        sessions: Arc<dyn SessionStore>,
        frames: Arc<dyn FrameSource>,
        auth: JwtVerifier,
    ) -> Self {
        Self {
            config,
            pipeline,
            sessions,
            frames,
            auth: Arc::new(auth),
        }
    }
}
