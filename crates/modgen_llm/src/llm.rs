//! LLM adapter for chat completions.
//!
//! Supports OpenAI and Anthropic APIs, selected by the resolved credentials.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{CompletionClient, CompletionRequest};
use crate::credentials::{Credentials, LlmProvider};
use crate::error::{LlmError, LlmResult};

const MAX_RETRIES: u32 = 3;

/// Tunables for completion requests.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    /// Model override; provider default when `None`
    pub model: Option<String>,
    /// API base URL override (e.g. a proxy or Azure deployment)
    pub base_url: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: None,
            base_url: None,
            temperature: 0.2,
            max_tokens: 16384,
        }
    }
}

/// LLM adapter that handles API calls
pub struct LlmAdapter {
    credentials: Credentials,
    model: String,
    base_url: String,
    temperature: f64,
    max_tokens: u32,
    client: reqwest::Client,
}

impl LlmAdapter {
    /// Create a new LLM adapter.
    pub fn new(credentials: Credentials, settings: LlmSettings) -> Self {
        let provider = credentials.provider();
        let base_url = settings
            .base_url
            .unwrap_or_else(|| provider.default_base_url().to_string());

        Self {
            model: settings
                .model
                .unwrap_or_else(|| provider.default_model().to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            credentials,
            client: reqwest::Client::new(),
        }
    }

    /// Get the current provider
    pub fn provider(&self) -> LlmProvider {
        self.credentials.provider()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    fn anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system: request.system.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.user.clone(),
            }],
        }
    }

    // OpenAI chat completion
    async fn complete_openai(&self, request: &CompletionRequest) -> LlmResult<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.openai_request(request);

        let response: OpenAIResponse = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .bearer_auth(self.credentials.api_key())
                    .json(&body)
            })
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No response from OpenAI".to_string()))
    }

    // Anthropic messages API
    async fn complete_anthropic(&self, request: &CompletionRequest) -> LlmResult<String> {
        let url = format!("{}/messages", self.base_url);
        let body = self.anthropic_request(request);

        let response: AnthropicResponse = self
            .send_with_retry(|| {
                self.client
                    .post(&url)
                    .header("x-api-key", self.credentials.api_key())
                    .header("anthropic-version", "2023-06-01")
                    .json(&body)
            })
            .await?;

        let text: String = response
            .content
            .into_iter()
            .filter_map(|c| c.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            Err(LlmError::InvalidResponse(
                "No response from Anthropic".to_string(),
            ))
        } else {
            Ok(text)
        }
    }

    /// Send a request, retrying transient errors (5xx, rate limits, network
    /// issues) with exponential backoff.
    async fn send_with_retry<B, R>(&self, build: B) -> LlmResult<R>
    where
        B: Fn() -> reqwest::RequestBuilder,
        R: DeserializeOwned,
    {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 2s, 4s
                let delay = Duration::from_secs(1 << attempt);
                tokio::time::sleep(delay).await;
            }

            match self.send_once(build()).await {
                Ok(parsed) => return Ok(parsed),
                Err(e) if e.is_transient() => {
                    warn!(
                        "{} request failed (attempt {}/{}): {}",
                        self.provider(),
                        attempt + 1,
                        MAX_RETRIES,
                        e
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LlmError::InvalidResponse("Max retries exceeded".to_string())
        }))
    }

    async fn send_once<R: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> LlmResult<R> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                provider: self.provider().to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CompletionClient for LlmAdapter {
    async fn complete(&self, request: &CompletionRequest) -> LlmResult<String> {
        debug!(
            model = %self.model,
            system_len = request.system.len(),
            user_len = request.user.len(),
            "Requesting completion"
        );

        let content = match self.provider() {
            LlmProvider::OpenAI => self.complete_openai(request).await?,
            LlmProvider::Anthropic => self.complete_anthropic(request).await?,
        };

        debug!(response_len = content.len(), "Completion received");
        Ok(content.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(provider: LlmProvider, settings: LlmSettings) -> LlmAdapter {
        LlmAdapter::new(Credentials::new(provider, "key"), settings)
    }

    #[test]
    fn test_default_models() {
        let openai = adapter(LlmProvider::OpenAI, LlmSettings::default());
        assert_eq!(openai.model(), "gpt-4o");
        assert_eq!(openai.base_url(), "https://api.openai.com/v1");

        let anthropic = adapter(LlmProvider::Anthropic, LlmSettings::default());
        assert_eq!(anthropic.model(), "claude-sonnet-4-5");
    }

    #[test]
    fn test_custom_model_and_base_url() {
        let adapter = adapter(
            LlmProvider::OpenAI,
            LlmSettings {
                model: Some("gpt-4.1".to_string()),
                base_url: Some("http://localhost:8080/v1/".to_string()),
                ..LlmSettings::default()
            },
        );
        assert_eq!(adapter.model(), "gpt-4.1");
        assert_eq!(adapter.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_openai_request_shape() {
        let adapter = adapter(LlmProvider::OpenAI, LlmSettings::default());
        let body = adapter.openai_request(&CompletionRequest::new("be terse", "write hcl"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 16384);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be terse");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "write hcl");
    }

    #[test]
    fn test_anthropic_request_keeps_system_separate() {
        let adapter = adapter(LlmProvider::Anthropic, LlmSettings::default());
        let body = adapter.anthropic_request(&CompletionRequest::new("be terse", "write hcl"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["system"], "be terse");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_parsing() {
        let openai: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"resource {}"}}],"usage":{"prompt_tokens":1,"completion_tokens":2}}"#,
        )
        .unwrap();
        assert_eq!(openai.choices[0].message.content.as_deref(), Some("resource {}"));

        let anthropic: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"variable \"x\" {}"}]}"#,
        )
        .unwrap();
        assert_eq!(anthropic.content[0].text.as_deref(), Some("variable \"x\" {}"));
    }
}
