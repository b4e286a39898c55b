//! Provider trait — the abstraction over the completion gateway.
//!
//! A Provider knows how to send an ordered list of messages to a language
//! model and get generated text back, either as one string or as a stream
//! of text fragments.
//!
//! Implementations: OpenAI-compatible endpoints, scripted test providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::ProviderError;
use crate::message::Message;

/// Per-call generation options.
///
/// `None` means "use the gateway's configured default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A finite, single-pass sequence of text fragments.
///
/// Backed by a bounded channel fed by the provider. Once exhausted it keeps
/// returning `None`; it cannot be restarted. Dropping the stream closes the
/// channel, which tells the producer to stop reading from its connection.
pub struct TextStream {
    rx: mpsc::Receiver<Result<String, ProviderError>>,
}

impl TextStream {
    /// Create a connected sender/stream pair.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Result<String, ProviderError>>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self { rx })
    }

    /// The next fragment, or `None` once the producer has finished.
    pub async fn next(&mut self) -> Option<Result<String, ProviderError>> {
        self.rx.recv().await
    }

    /// Drain the stream and concatenate every fragment.
    ///
    /// Fails on the first fragment that carries an error.
    pub async fn collect_text(mut self) -> Result<String, ProviderError> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

/// The core Provider trait.
///
/// The controllers call `complete()` without knowing which backend is in
/// use. `stream()` exists for interactive display; concatenating its
/// fragments yields the same text `complete()` would.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "scripted").
    fn name(&self) -> &str;

    /// Send the messages and get the complete generated text.
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, ProviderError>;

    /// Send the messages and get a stream of text fragments.
    ///
    /// Default implementation calls `complete()` and yields the result as a
    /// single fragment.
    async fn stream(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<TextStream, ProviderError> {
        let text = self.complete(messages, options).await?;
        let (tx, stream) = TextStream::channel(1);
        let _ = tx.send(Ok(text)).await;
        Ok(stream)
    }
}
