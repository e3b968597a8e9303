//! Frame extraction client.
//!
//! Frames come from the pose service, which decodes the session video and
//! returns every `sampleRate`-th frame as base64 JPEG.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use coach_models::Frame;

use crate::config::FrameSourceConfig;
use crate::error::UpstreamError;

const SERVICE: &str = "frame service";

/// Source of video frames for a session.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn extract(&self, video_url: &str) -> Result<Vec<Frame>, UpstreamError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractFramesRequest<'a> {
    video_url: &'a str,
    sample_rate: u32,
}

#[derive(Deserialize)]
struct ExtractFramesResponse {
    #[serde(default)]
    frames: Vec<Frame>,
}

/// HTTP client for the pose service's frame extraction endpoint.
#[derive(Clone)]
pub struct HttpFrameSource {
    http: Client,
    config: FrameSourceConfig,
}

impl HttpFrameSource {
    pub fn new(config: FrameSourceConfig) -> Result<Self, UpstreamError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, UpstreamError> {
        Self::new(FrameSourceConfig::from_env())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/api/pose/extract-frames",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl FrameSource for HttpFrameSource {
    async fn extract(&self, video_url: &str) -> Result<Vec<Frame>, UpstreamError> {
        let request = ExtractFramesRequest {
            video_url,
            sample_rate: self.config.sample_rate,
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("X-Internal-Request", "true")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Frame extraction failed: {}", body);
            return Err(UpstreamError::unavailable(
                SERVICE,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let parsed: ExtractFramesResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::invalid_response(SERVICE, e.to_string()))?;

        debug!(frames = parsed.frames.len(), "Extracted frames");
        Ok(parsed.frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> HttpFrameSource {
        HttpFrameSource::new(FrameSourceConfig {
            base_url: server.uri(),
            sample_rate: 5,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_extract_frames() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/pose/extract-frames"))
            .and(header("X-Internal-Request", "true"))
            .and(body_json(serde_json::json!({
                "videoUrl": "https://cdn.example.com/swing.mp4",
                "sampleRate": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "frames": [
                    { "frameIndex": 0, "image": "/9j/AAAA" },
                    { "frameIndex": 5, "image": "/9j/BBBB" }
                ]
            })))
            .mount(&server)
            .await;

        let frames = source(&server)
            .extract("https://cdn.example.com/swing.mp4")
            .await
            .unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].index(), 5);
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("ffmpeg crashed"))
            .mount(&server)
            .await;

        let result = source(&server).extract("https://cdn.example.com/swing.mp4").await;
        assert!(matches!(result, Err(UpstreamError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "frames": [{ "frameIndex": 0, "image": "%%%" }]
            })))
            .mount(&server)
            .await;

        let result = source(&server).extract("https://cdn.example.com/swing.mp4").await;
        assert!(matches!(result, Err(UpstreamError::InvalidResponse { .. })));
    }
}
