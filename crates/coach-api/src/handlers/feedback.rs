//! Coaching feedback handler.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use coach_feedback::{sampler, FeedbackError};
use coach_models::{FeedbackResponse, Frame};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Optional request body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Upper bound on frames sent to the model. Values below 1 are clamped.
    #[serde(default)]
    pub max_frames: Option<i64>,
    /// Frames supplied inline instead of extracting them from the session video.
    #[serde(default)]
    pub frames: Option<Vec<Frame>>,
}

impl FeedbackRequest {
    /// Parse an optional JSON body; an empty body means all defaults.
    pub fn parse(body: &[u8]) -> ApiResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
    }

    fn frame_limit(&self, default: usize) -> usize {
        match self.max_frames {
            Some(n) => usize::try_from(n.max(1)).unwrap_or(usize::MAX),
            None => default,
        }
    }
}

/// Generate coaching feedback for a session.
pub async fn generate_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<FeedbackResponse>> {
    let request = FeedbackRequest::parse(&body)?;

    let session = state
        .sessions
        .get(&session_id)
        .await?
        .filter(|s| s.is_owned_by(&user.uid))
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    let pipeline = state
        .pipeline
        .as_ref()
        .map_err(|msg| ApiError::configuration(msg.clone()))?;

    let limit = request.frame_limit(pipeline.config().max_frames);
    let context = session.pose_summary();

    let frames = match request.frames {
        Some(frames) if !frames.is_empty() => frames,
        _ => {
            let video_url = session
                .video_url
                .as_deref()
                .ok_or_else(|| ApiError::service_unavailable("Session has no video to analyze"))?;
            state.frames.extract(video_url).await?
        }
    };

    if frames.is_empty() {
        return Err(ApiError::service_unavailable("No frames available for analysis"));
    }

    let selected = sampler::select(&frames, limit);
    let sampled = sampler::with_detail(&selected);

    info!(
        session_id = %session_id,
        uid = %user.uid,
        total_frames = frames.len(),
        frames_analyzed = sampled.len(),
        "Generating feedback"
    );

    // Dropping the handler future (client disconnect) cancels the run.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let result = match pipeline
        .run_with_context(&sampled, context.as_deref(), &cancel)
        .await
    {
        Ok(result) => result,
        Err(FeedbackError::Cancelled) => {
            info!(session_id = %session_id, "Feedback generation cancelled");
            return Err(ApiError::internal("Feedback generation cancelled"));
        }
        Err(e) => return Err(ApiError::internal(e.to_string())),
    };

    let response = FeedbackResponse::from_result(result, sampled.len(), frames.len());

    if let Err(e) = state.sessions.save_feedback(&session_id, &response).await {
        warn!(session_id = %session_id, "Failed to persist feedback: {}", e);
    }

    info!(
        session_id = %session_id,
        source = response.source.as_str(),
        attempts_used = response.attempts_used,
        "Feedback generated"
    );

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_default() {
        let request = FeedbackRequest::parse(b"").unwrap();
        assert!(request.max_frames.is_none());
        assert!(request.frames.is_none());

        assert!(FeedbackRequest::parse(b"  \n").is_ok());
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        assert!(matches!(
            FeedbackRequest::parse(b"{not json"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            FeedbackRequest::parse(br#"{"frames":[{"frameIndex":0,"image":"%%%"}]}"#),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_frame_limit_clamps() {
        let request = FeedbackRequest::parse(br#"{"maxFrames": 0}"#).unwrap();
        assert_eq!(request.frame_limit(6), 1);

        let request = FeedbackRequest::parse(br#"{"maxFrames": -4}"#).unwrap();
        assert_eq!(request.frame_limit(6), 1);

        let request = FeedbackRequest::parse(br#"{"maxFrames": 3}"#).unwrap();
        assert_eq!(request.frame_limit(6), 3);

        assert_eq!(FeedbackRequest::default().frame_limit(6), 6);
    }

    #[test]
    fn test_inline_frames_parse() {
        let request =
            FeedbackRequest::parse(br#"{"frames":[{"frameIndex":7,"image":"/9j/AAAA"}]}"#).unwrap();
        let frames = request.frames.unwrap();
        assert_eq!(frames[0].index(), 7);
    }
}
