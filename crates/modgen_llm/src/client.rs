//! Completion client abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmResult;

/// A single-turn completion request: one system instruction, one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Anything that can turn a [`CompletionRequest`] into raw model output.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request a completion. The returned text is trimmed but otherwise raw.
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
