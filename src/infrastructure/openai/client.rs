//! OpenAI chat-completions scoring backend.

use crate::application::sentiment::prompt::SYSTEM_MESSAGE;
use crate::domain::errors::ScoringError;
use crate::domain::ports::SentimentBackend;
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Scores articles through `POST {base_url}/chat/completions` in JSON mode.
///
/// Retries belong to the scorer, so the HTTP client carries no retry
/// middleware.
pub struct OpenAiSentimentBackend {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiSentimentBackend {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = HttpClientFactory::create_plain_client(config.timeout);
        Self { config, client }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

/// Maps a non-success HTTP status onto the scoring error taxonomy.
pub fn classify_status(status: StatusCode, body: String) -> ScoringError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ScoringError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ScoringError::Authentication(body),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ScoringError::Timeout,
        _ => ScoringError::Api {
            status: status.as_u16(),
            message: body,
        },
    }
}

fn classify_transport(err: reqwest::Error) -> ScoringError {
    if err.is_timeout() {
        ScoringError::Timeout
    } else {
        ScoringError::Transport(err.to_string())
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions body.
pub fn extract_content(body: &str) -> Result<String, ScoringError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ScoringError::MalformedResponse(format!("invalid completion body: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ScoringError::MalformedResponse("missing choices[0].message.content".into()))
}

#[async_trait]
impl SentimentBackend for OpenAiSentimentBackend {
    async fn complete_json(&self, prompt: &str) -> Result<String, ScoringError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport)?;

        if !status.is_success() {
            return Err(classify_status(status, body));
        }

        debug!("OpenAiSentimentBackend: {} bytes from {}", body.len(), self.config.model);
        extract_content(&body)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
