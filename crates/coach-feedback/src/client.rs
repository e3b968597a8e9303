//! Vision model client.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use coach_models::{AttemptPrompt, SampledFrame};

use crate::config::OpenRouterConfig;
use crate::error::{FeedbackError, FeedbackResult};
use crate::metrics;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, MessageContent, Role};

/// A vision-capable chat model that answers one prompt over a set of frames.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Return the raw text of the model's answer.
    async fn complete(
        &self,
        prompt: &AttemptPrompt,
        frames: &[SampledFrame<'_>],
    ) -> FeedbackResult<String>;

    /// Model identifier used in logs.
    fn model_name(&self) -> &str;
}

/// Client for an OpenRouter-compatible chat completions endpoint.
pub struct OpenRouterClient {
    http: Client,
    config: OpenRouterConfig,
    api_key: String,
}

impl OpenRouterClient {
    /// Create a new client. Fails when the key or base URL is unusable.
    pub fn new(config: OpenRouterConfig) -> FeedbackResult<Self> {
        config.validate()?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| FeedbackError::config("OPENROUTER_API_KEY is not configured"))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FeedbackError::Network)?;

        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> FeedbackResult<Self> {
        Self::new(OpenRouterConfig::from_env())
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    fn build_request(&self, prompt: &AttemptPrompt, frames: &[SampledFrame<'_>]) -> ChatRequest {
        let mut parts = Vec::with_capacity(frames.len() + 1);
        parts.push(ContentPart::Text {
            text: prompt.user.clone(),
        });
        parts.extend(frames.iter().map(|sampled| ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: sampled.frame.data_uri(),
                detail: sampled.detail,
            },
        }));

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: MessageContent::Text(prompt.system.clone()),
                },
                ChatMessage {
                    role: Role::User,
                    content: MessageContent::Parts(parts),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl VisionModel for OpenRouterClient {
    async fn complete(
        &self,
        prompt: &AttemptPrompt,
        frames: &[SampledFrame<'_>],
    ) -> FeedbackResult<String> {
        let url = self.config.endpoint();
        let request = self.build_request(prompt, frames);

        debug!(
            model = %self.config.model,
            frames = frames.len(),
            "Sending chat completion request to {}", url
        );

        let start = Instant::now();
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FeedbackError::Timeout(self.config.timeout.as_secs())
                } else {
                    FeedbackError::Network(e)
                }
            })?;
        metrics::record_model_latency(&self.config.model, start.elapsed().as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(500).collect();
            warn!(status = %status, "Model provider returned an error: {}", body);
            return Err(FeedbackError::from_http_status(status.as_u16(), body));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            FeedbackError::RequestFailed(format!("Failed to parse chat response: {}", e))
        })?;

        chat.first_content().ok_or(FeedbackError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use coach_models::{Frame, FrameDetail};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> OpenRouterClient {
        OpenRouterClient::new(OpenRouterConfig {
            api_key: Some("sk-test".to_string()),
            base_url: format!("{}/api/v1", server.uri()),
            model: "test/vision".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap()
    }

    fn frames() -> Vec<Frame> {
        vec![
            Frame::from_jpeg(0, b"first".to_vec()),
            Frame::from_jpeg(15, b"second".to_vec()),
        ]
    }

    fn sampled(frames: &[Frame]) -> Vec<SampledFrame<'_>> {
        frames
            .iter()
            .enumerate()
            .map(|(i, frame)| SampledFrame {
                frame,
                detail: if i == 0 { FrameDetail::High } else { FrameDetail::Low },
            })
            .collect()
    }

    #[test]
    fn test_new_requires_key() {
        let err = OpenRouterClient::new(OpenRouterConfig::default()).err().unwrap();
        assert!(matches!(err, FeedbackError::Config(_)));
    }

    #[tokio::test]
    async fn test_complete_returns_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("x-title", "Baseball Trainer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Tuck your elbow. Rotate your hips."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let frames = frames();
        let text = client
            .complete(&AttemptPrompt::new("sys", "user"), &sampled(&frames))
            .await
            .unwrap();
        assert_eq!(text, "Tuck your elbow. Rotate your hips.");
    }

    #[tokio::test]
    async fn test_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let frames = frames();
        client
            .complete(&AttemptPrompt::new("be strict", "analyze"), &sampled(&frames))
            .await
            .unwrap();

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

        assert_eq!(body["model"], "test/vision");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be strict");

        let parts = body["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "analyze");
        assert_eq!(parts[1]["image_url"]["detail"], "high");
        assert_eq!(parts[2]["image_url"]["detail"], "low");
        assert!(parts[1]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .complete(&AttemptPrompt::new("s", "u"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, FeedbackError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let prompt = AttemptPrompt::new("s", "u");

        let first = client.complete(&prompt, &[]).await.unwrap_err();
        assert!(matches!(first, FeedbackError::RateLimited(_)));

        let second = client.complete(&prompt, &[]).await.unwrap_err();
        assert!(matches!(second, FeedbackError::ServerError(502, _)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .complete(&AttemptPrompt::new("s", "u"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, FeedbackError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .complete(&AttemptPrompt::new("s", "u"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, FeedbackError::Timeout(2)));
    }
}
