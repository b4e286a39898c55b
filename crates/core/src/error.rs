//! Error types for the thinkloop domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error enum.

use thiserror::Error;

/// A failure reported by the completion gateway.
///
/// The variants only refine the human-readable cause; callers treat every
/// variant the same way (the current run ends without an answer).
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures inside a tool implementation.
///
/// These never cross the [`Tool`](crate::tool::Tool) boundary: tools turn
/// them into observation text with [`ToolError::to_observation`].
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool_name} is not configured: {reason}")]
    NotConfigured { tool_name: String, reason: String },

    #[error("{tool_name} failed with error: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("{tool_name} timed out after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),
}

impl ToolError {
    /// Render this error as the observation text handed back to the model.
    pub fn to_observation(&self) -> String {
        format!("Error: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_becomes_observation() {
        let err = ToolError::ExecutionFailed {
            tool_name: "Search".into(),
            reason: "connection reset".into(),
        };
        assert_eq!(
            err.to_observation(),
            "Error: Search failed with error: connection reset"
        );
    }
}
