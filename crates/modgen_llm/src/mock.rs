//! Scripted completion client for tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::{LlmError, LlmResult};

/// Completion client that replays queued responses and records requests.
///
/// When the queue runs dry the fallback response (if any) is returned,
/// otherwise [`LlmError::Exhausted`].
#[derive(Clone, Default)]
pub struct MockCompletionClient {
    responses: Arc<RwLock<VecDeque<String>>>,
    fallback: Arc<RwLock<Option<String>>>,
    requests: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn add_response(self, response: impl Into<String>) -> Self {
        self.responses.write().push_back(response.into());
        self
    }

    /// Response used once the queue is empty.
    pub fn with_fallback(self, response: impl Into<String>) -> Self {
        *self.fallback.write() = Some(response.into());
        self
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().len()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        self.requests.write().push(request.clone());

        let next = self.responses.write().pop_front();
        next.or_else(|| self.fallback.read().clone())
            .map(|r| r.trim().to_string())
            .ok_or(LlmError::Exhausted)
    }

    fn model(&self) -> &str {
        "mock"
    }
}
