//! Training session as seen by the feedback service.
//!
//! Sessions are owned by the session store; this service only reads the
//! fields it needs and writes back the generated feedback.

use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackResponse;

/// A recorded training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// Location of the recorded swing video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Opaque biomechanics output of the pose service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose_analysis: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackResponse>,
}

impl Session {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            video_url: None,
            pose_analysis: None,
            feedback: None,
        }
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    pub fn with_pose_analysis(mut self, analysis: serde_json::Value) -> Self {
        self.pose_analysis = Some(analysis);
        self
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Compact text summary of the pose analysis for prompt context.
    ///
    /// Only the `formAnalysis` metrics (value and ideal range) and the
    /// pose service's own feedback lines are kept.
    pub fn pose_summary(&self) -> Option<String> {
        let form = self.pose_analysis.as_ref()?.get("formAnalysis")?.as_object()?;

        let mut lines = Vec::new();
        for (name, metric) in form {
            let Some(value) = metric.get("value").and_then(|v| v.as_f64()) else {
                continue;
            };
            let ideal = metric
                .get("ideal")
                .and_then(|i| i.as_array())
                .filter(|i| i.len() == 2)
                .map(|i| {
                    format!(
                        " (ideal {}-{})",
                        i[0].as_f64().unwrap_or_default(),
                        i[1].as_f64().unwrap_or_default()
                    )
                })
                .unwrap_or_default();
            lines.push(format!("- {}: {:.1}{}", name, value, ideal));
        }

        if let Some(notes) = form.get("feedback").and_then(|f| f.as_array()) {
            for note in notes.iter().filter_map(|n| n.as_str()) {
                lines.push(format!("- note: {}", note));
            }
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}
