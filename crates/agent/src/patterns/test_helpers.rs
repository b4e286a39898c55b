//! Shared test helpers for pattern tests.

use std::sync::Mutex;

use thinkloop_core::error::ProviderError;
use thinkloop_core::message::Message;
use thinkloop_core::provider::{CompletionOptions, Provider};

/// One recorded `complete` call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
}

impl RecordedRequest {
    /// The single user prompt the controllers send.
    pub fn prompt(&self) -> &str {
        &self.messages[0].content
    }
}

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue.
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Vec<Result<String, ProviderError>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that answers with each text in turn.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();

        if call >= self.responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                call,
                self.responses.len()
            );
        }

        requests.push(RecordedRequest {
            messages: messages.to_vec(),
            options: *options,
        });
        self.responses[call].clone()
    }
}

/// A gateway failure as the OpenAI-compatible provider would report it.
pub fn api_error(message: &str) -> ProviderError {
    ProviderError::ApiError {
        status_code: 500,
        message: message.into(),
    }
}
