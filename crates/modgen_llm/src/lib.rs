//! # modgen_llm - completion adapters for modgen
//!
//! This crate provides the single operation modgen needs from a language
//! model: send a system instruction plus user content, get text back.
//!
//! - [`CompletionClient`] is the seam the generator depends on
//! - [`LlmAdapter`] talks to OpenAI or Anthropic over HTTP
//! - [`Credentials`] resolves the API key from the environment
//! - [`MockCompletionClient`] returns scripted responses in tests

pub mod client;
pub mod credentials;
pub mod error;
pub mod llm;
pub mod mock;

pub use client::{CompletionClient, CompletionRequest};
pub use credentials::{Credentials, LlmProvider};
pub use error::{LlmError, LlmResult};
pub use llm::{LlmAdapter, LlmSettings};
pub use mock::MockCompletionClient;
