//! Retry orchestration over the vision model.
//!
//! Each attempt asks the model with a progressively stricter prompt, then
//! normalizes and classifies the answer. The first specific answer wins. When
//! every attempt is rejected the static fallback is returned, so a run only
//! fails when it is cancelled.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use coach_models::{PipelineResult, SampledFrame};

use crate::client::VisionModel;
use crate::config::PipelineConfig;
use crate::error::{FeedbackError, FeedbackResult};
use crate::prompts::PromptEscalator;
use crate::validator::{FeedbackValidator, Verdict};
use crate::{fallback, metrics, normalizer};

/// Why a single attempt did not produce usable feedback.
#[derive(Debug)]
enum Rejection {
    Failed(FeedbackError),
    Unnormalizable,
    Generic(Verdict),
}

/// Feedback synthesis pipeline.
///
/// Cheap to clone; all configuration is immutable and shared.
#[derive(Clone)]
pub struct FeedbackPipeline {
    model: Arc<dyn VisionModel>,
    prompts: Arc<PromptEscalator>,
    validator: Arc<FeedbackValidator>,
    config: PipelineConfig,
}

impl FeedbackPipeline {
    /// Build a pipeline. Fails when `validator` would reject the fallback
    /// text, since exhausted runs must still return specific feedback.
    pub fn new(
        model: Arc<dyn VisionModel>,
        prompts: PromptEscalator,
        validator: FeedbackValidator,
        config: PipelineConfig,
    ) -> FeedbackResult<Self> {
        let verdict = validator.classify(Some(fallback::generate()));
        if verdict != Verdict::Specific {
            return Err(FeedbackError::config(format!(
                "feedback lexicon rejects the fallback text ({}); adjust FEEDBACK_LEXICON_PATH",
                verdict
            )));
        }

        Ok(Self {
            model,
            prompts: Arc::new(prompts),
            validator: Arc::new(validator),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Run the pipeline over already-sampled frames.
    pub async fn run(
        &self,
        frames: &[SampledFrame<'_>],
        cancel: &CancellationToken,
    ) -> FeedbackResult<PipelineResult> {
        self.run_with_context(frames, None, cancel).await
    }

    /// Run the pipeline, adding optional swing measurements to every prompt.
    ///
    /// Returns `Err(FeedbackError::Cancelled)` only when `cancel` fires.
    pub async fn run_with_context(
        &self,
        frames: &[SampledFrame<'_>],
        context: Option<&str>,
        cancel: &CancellationToken,
    ) -> FeedbackResult<PipelineResult> {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return Err(FeedbackError::Cancelled);
            }

            match self.attempt(attempt, frames, context, cancel).await {
                Ok(feedback) => {
                    metrics::record_attempt(attempt, "accepted");
                    metrics::record_result("model");
                    info!(
                        attempt,
                        model = %self.model.model_name(),
                        "Accepted model feedback"
                    );
                    return Ok(PipelineResult::Accepted {
                        feedback,
                        attempts_used: attempt,
                    });
                }
                Err(Rejection::Failed(FeedbackError::Cancelled)) => {
                    return Err(FeedbackError::Cancelled);
                }
                Err(Rejection::Failed(e)) => {
                    metrics::record_attempt(attempt, "failed");
                    warn!(
                        attempt,
                        transient = e.is_transient(),
                        "Model call failed: {}", e
                    );
                }
                Err(Rejection::Unnormalizable) => {
                    metrics::record_attempt(attempt, "unnormalizable");
                    debug!(attempt, "Model answer had fewer than two sentences");
                }
                Err(Rejection::Generic(verdict)) => {
                    metrics::record_attempt(attempt, "rejected");
                    debug!(attempt, verdict = %verdict, "Model answer rejected as generic");
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(FeedbackError::Cancelled),
                    _ = tokio::time::sleep(self.config.retry_delay) => {}
                }
            }
        }

        metrics::record_result("fallback");
        info!(
            attempts = max_attempts,
            "All attempts rejected, using fallback feedback"
        );
        Ok(PipelineResult::Fallback {
            feedback: fallback::generate().to_string(),
            attempts_used: max_attempts,
        })
    }

    /// One request/normalize/validate cycle.
    async fn attempt(
        &self,
        attempt: u32,
        frames: &[SampledFrame<'_>],
        context: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, Rejection> {
        let prompt = self.prompts.prompt_for(attempt).with_context(context);

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Rejection::Failed(FeedbackError::Cancelled)),
            result = self.model.complete(&prompt, frames) => result.map_err(Rejection::Failed)?,
        };

        let normalized = normalizer::normalize(Some(&raw)).ok_or(Rejection::Unnormalizable)?;

        match self.validator.classify(Some(&normalized)) {
            Verdict::Specific => Ok(normalized),
            verdict => Err(Rejection::Generic(verdict)),
        }
    }
}
