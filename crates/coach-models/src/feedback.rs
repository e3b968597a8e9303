//! Coaching feedback types.

use serde::{Deserialize, Serialize};

/// A (system, user) instruction pair sent to the model for one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptPrompt {
    pub system: String,
    pub user: String,
}

impl AttemptPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Append swing context (e.g. a pose-analysis summary) to the user text.
    pub fn with_context(&self, context: Option<&str>) -> Self {
        match context.map(str::trim).filter(|c| !c.is_empty()) {
            Some(context) => Self {
                system: self.system.clone(),
                user: format!("{}\n\nSwing measurements:\n{}", self.user, context),
            },
            None => self.clone(),
        }
    }
}

/// Where the returned feedback came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSource {
    Model,
    Fallback,
}

impl FeedbackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSource::Model => "model",
            FeedbackSource::Fallback => "fallback",
        }
    }
}

/// Outcome of one pipeline run. Always carries usable feedback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    /// The model produced specific feedback on attempt `attempts_used`.
    Accepted {
        feedback: String,
        attempts_used: u32,
    },
    /// Every attempt was rejected; the static fallback is returned.
    Fallback { feedback: String, attempts_used: u32 },
}

impl PipelineResult {
    pub fn feedback(&self) -> &str {
        match self {
            PipelineResult::Accepted { feedback, .. } | PipelineResult::Fallback { feedback, .. } => {
                feedback
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, PipelineResult::Accepted { .. })
    }

    pub fn attempts_used(&self) -> u32 {
        match self {
            PipelineResult::Accepted { attempts_used, .. }
            | PipelineResult::Fallback { attempts_used, .. } => *attempts_used,
        }
    }

    pub fn source(&self) -> FeedbackSource {
        if self.is_accepted() {
            FeedbackSource::Model
        } else {
            FeedbackSource::Fallback
        }
    }

    pub fn into_feedback(self) -> String {
        match self {
            PipelineResult::Accepted { feedback, .. } | PipelineResult::Fallback { feedback, .. } => {
                feedback
            }
        }
    }
}

/// Response body returned to callers and persisted on the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub ok: bool,
    pub feedback: String,
    pub frames_analyzed: usize,
    pub total_frames: usize,
    pub attempts_used: u32,
    pub source: FeedbackSource,
}

impl FeedbackResponse {
    /// Build a response from a pipeline result. Fallback output is still `ok`.
    pub fn from_result(result: PipelineResult, frames_analyzed: usize, total_frames: usize) -> Self {
        let attempts_used = result.attempts_used();
        let source = result.source();
        Self {
            ok: true,
            feedback: result.into_feedback(),
            frames_analyzed,
            total_frames,
            attempts_used,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_appends_measurements() {
        let prompt = AttemptPrompt::new("sys", "Analyze the swing.");
        let with = prompt.with_context(Some("hip_rotation: 42"));
        assert_eq!(with.system, "sys");
        assert!(with.user.starts_with("Analyze the swing."));
        assert!(with.user.ends_with("hip_rotation: 42"));

        assert_eq!(prompt.with_context(Some("   ")), prompt);
        assert_eq!(prompt.with_context(None), prompt);
    }

    #[test]
    fn test_fallback_response_is_ok() {
        let result = PipelineResult::Fallback {
            feedback: "Tuck your elbow.".to_string(),
            attempts_used: 3,
        };
        let response = FeedbackResponse::from_result(result, 6, 40);
        assert!(response.ok);
        assert_eq!(response.source, FeedbackSource::Fallback);
        assert_eq!(response.attempts_used, 3);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["framesAnalyzed"], 6);
        assert_eq!(json["totalFrames"], 40);
        assert_eq!(json["source"], "fallback");
    }

    #[test]
    fn test_accepted_accessors() {
        let result = PipelineResult::Accepted {
            feedback: "Fix it. Adjust it.".to_string(),
            attempts_used: 2,
        };
        assert!(result.is_accepted());
        assert_eq!(result.attempts_used(), 2);
        assert_eq!(result.source(), FeedbackSource::Model);
        assert_eq!(result.feedback(), "Fix it. Adjust it.");
    }
}
