//! Error types for the core module.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while generating a module.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("LLM error: {0}")]
    Llm(#[from] modgen_llm::LlmError),

    #[error("IaC error: {0}")]
    Iac(#[from] modgen_iac::IacError),

    #[error("Runner error: {0}")]
    Runner(#[from] modgen_runner::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
