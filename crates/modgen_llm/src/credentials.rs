//! API credential resolution.

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, LlmResult};

pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// LLM provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAI,
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's key.
    pub fn key_var(&self) -> &'static str {
        match self {
            Self::OpenAI => OPENAI_KEY_VAR,
            Self::Anthropic => ANTHROPIC_KEY_VAR,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o",
            Self::Anthropic => "claude-sonnet-4-5",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "OpenAI"),
            Self::Anthropic => write!(f, "Anthropic"),
        }
    }
}

/// A provider together with its API key.
#[derive(Clone)]
pub struct Credentials {
    provider: LlmProvider,
    api_key: String,
}

impl Credentials {
    pub fn new(provider: LlmProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
        }
    }

    /// Resolve credentials from the process environment.
    ///
    /// Checks in order:
    /// 1. OPENAI_API_KEY
    /// 2. ANTHROPIC_API_KEY
    pub fn from_env(preferred: Option<LlmProvider>) -> LlmResult<Self> {
        Self::resolve(preferred, |name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    ///
    /// With a preferred provider only that provider's key is accepted.
    /// Empty values count as missing.
    pub fn resolve<F>(preferred: Option<LlmProvider>, lookup: F) -> LlmResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_for = |provider: LlmProvider| {
            lookup(provider.key_var())
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .map(|k| Self::new(provider, k))
        };

        match preferred {
            Some(provider) => key_for(provider).ok_or(LlmError::MissingKey(provider.key_var())),
            None => key_for(LlmProvider::OpenAI)
                .or_else(|| key_for(LlmProvider::Anthropic))
                .ok_or(LlmError::NotConfigured),
        }
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
