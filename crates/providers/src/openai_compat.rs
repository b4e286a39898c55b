//! OpenAI-compatible completion gateway.
//!
//! Works with: OpenAI, OpenRouter, DeepSeek, Qwen/DashScope, Ollama, vLLM,
//! and any endpoint exposing `/chat/completions`.
//!
//! Supports:
//! - Whole-response chat completions
//! - Streaming completions over SSE

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thinkloop_config::{ConfigError, LlmConfig};
use thinkloop_core::error::ProviderError;
use thinkloop_core::message::Message;
use thinkloop_core::provider::{CompletionOptions, Provider, TextStream};
use tracing::{debug, trace, warn};

/// An OpenAI-compatible completion gateway.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    default_temperature: f32,
    default_max_tokens: Option<u32>,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: Duration::from_secs(60),
            default_temperature: 0.0,
            default_max_tokens: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build a provider from the `[llm]` config section.
    ///
    /// Fails when the API key, base URL or model is missing.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let resolved = config.require_complete()?;
        let mut provider = Self::new(
            "openai_compat",
            resolved.base_url,
            resolved.api_key,
            resolved.model,
        )
        .with_timeout(Duration::from_secs(config.timeout_secs))
        .with_default_temperature(config.temperature);
        provider.default_max_tokens = config.max_tokens;
        Ok(provider)
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Temperature used when a call does not specify one.
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }

    /// Output token cap used when a call does not specify one.
    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert our Message types to OpenAI API format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: m.role.as_str().to_string(),
                content: Some(m.content.clone()),
            })
            .collect()
    }

    /// Build the JSON request body.
    fn request_body(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
        stream: bool,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": Self::to_api_messages(messages),
            "temperature": options.temperature.unwrap_or(self.default_temperature),
            "stream": stream,
        });

        if let Some(max_tokens) = options.max_tokens.or(self.default_max_tokens) {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// POST the body and map non-success statuses to provider errors.
    async fn send(
        &self,
        body: &serde_json::Value,
        stream: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut request = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if stream {
            request = request.header("Accept", "text/event-stream");
        }

        let response = request.json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        let body = self.request_body(messages, options, false);

        debug!(provider = %self.name, model = %self.model, "Sending completion request");

        let response = self.send(&body, false).await?;

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        Ok(choice.message.content.unwrap_or_default())
    }

    async fn stream(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<TextStream, ProviderError> {
        let body = self.request_body(messages, options, true);

        debug!(provider = %self.name, model = %self.model, "Sending streaming request");

        let response = self.send(&body, true).await?;

        let (tx, stream) = TextStream::channel(64);
        let provider_name = self.name.clone();

        // Spawn task to read the SSE byte stream and forward text fragments
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                // Chunks may end mid-character; only whole lines are decoded.
                buffer.extend_from_slice(&bytes);

                while let Some(line) = take_line(&mut buffer) {
                    match parse_sse_line(&line) {
                        SseLine::Fragment(text) => {
                            if tx.send(Ok(text)).await.is_err() {
                                return; // receiver dropped
                            }
                        }
                        SseLine::Done => return,
                        SseLine::Skip => {}
                        SseLine::Unparseable(error) => {
                            trace!(
                                provider = %provider_name,
                                line = %line,
                                error = %error,
                                "Ignoring unparseable SSE chunk"
                            );
                        }
                    }
                }
            }
            // Stream ended without [DONE]; dropping `tx` ends the TextStream.
        });

        Ok(stream)
    }
}

/// Remove the first complete line from `buffer` and decode it, without
/// the trailing `\n` or `\r\n`.
fn take_line(buffer: &mut Vec<u8>) -> Option<String> {
    let end = buffer.iter().position(|&b| b == b'\n')?;
    let raw: Vec<u8> = buffer.drain(..=end).collect();
    let line = String::from_utf8_lossy(&raw[..end]);
    Some(line.trim_end_matches('\r').to_string())
}

/// Interpretation of one SSE line.
#[derive(Debug, PartialEq)]
enum SseLine {
    /// A non-empty content delta
    Fragment(String),
    /// `data: [DONE]`
    Done,
    /// Blank line, comment, or a chunk without content
    Skip,
    Unparseable(String),
}

fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() || line.starts_with(':') {
        return SseLine::Skip;
    }

    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let data = data.trim();

    if data == "[DONE]" {
        return SseLine::Done;
    }

    match serde_json::from_str::<StreamResponse>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|c| !c.is_empty())
            .map(SseLine::Fragment)
            .unwrap_or(SseLine::Skip),
        Err(e) => SseLine::Unparseable(e.to_string()),
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

/// A single SSE `data: {...}` chunk from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
