//! Error types for the completion layer.

use thiserror::Error;

/// Result type for completion operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Completion errors.
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API credential in the environment.
    #[error("LLM not configured. Set OPENAI_API_KEY or ANTHROPIC_API_KEY")]
    NotConfigured,

    /// A specific provider was requested but its key is missing.
    #[error("LLM not configured. Set {0}")]
    MissingKey(&'static str),

    /// Transport failure after retries.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    /// The API answered but the body was not usable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Mock client has no scripted responses left.
    #[error("No scripted response available")]
    Exhausted,
}

impl LlmError {
    /// Whether a retry might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let rate_limited = LlmError::Api {
            provider: "OpenAI".to_string(),
            status: 429,
            body: String::new(),
        };
        let bad_request = LlmError::Api {
            provider: "OpenAI".to_string(),
            status: 400,
            body: String::new(),
        };

        assert!(rate_limited.is_transient());
        assert!(!bad_request.is_transient());
        assert!(!LlmError::NotConfigured.is_transient());
    }
}
