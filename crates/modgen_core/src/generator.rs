//! Generate → validate → correct loop.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use modgen_iac::ModuleValidator;
use modgen_llm::CompletionClient;

use crate::error::CoreResult;
use crate::output::ModuleLayout;
use crate::prompts::PromptSet;
use crate::sanitize::strip_code_fences;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Details of a draft that failed validation.
#[derive(Debug, Clone, Copy)]
pub struct AttemptFailure<'a> {
    pub attempt: u32,
    pub max_attempts: u32,
    pub error_text: &'a str,
    /// Directory holding the rejected draft
    pub draft_dir: &'a Path,
}

impl AttemptFailure<'_> {
    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempt)
    }
}

/// Hooks into the generation loop, used by the CLI to report progress and
/// pause between attempts.
pub trait AttemptObserver: Send + Sync {
    fn on_attempt_started(&self, _attempt: u32, _max_attempts: u32) {}

    /// Called after every failed validation, including the last one.
    /// An error aborts the run.
    fn on_validation_failed(&self, _failure: &AttemptFailure<'_>) -> CoreResult<()> {
        Ok(())
    }

    fn on_generation_finished(&self, _outcome: &GenerationOutcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl AttemptObserver for SilentObserver {}

/// Result of the generation loop.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Last draft produced (validated or not)
    pub content: String,
    /// Number of generation requests made
    pub attempts: u32,
    pub validated: bool,
    /// Validator output of the last failed attempt
    pub last_error: Option<String>,
}

/// Drives the bounded retry loop.
pub struct ModuleGenerator {
    client: Arc<dyn CompletionClient>,
    validator: Arc<dyn ModuleValidator>,
    max_attempts: u32,
}

impl ModuleGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, validator: Arc<dyn ModuleValidator>) -> Self {
        Self {
            client,
            validator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the attempt bound. At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Generate a module for `description`, validating each draft in the
    /// layout's temp directory.
    ///
    /// Stops at the first draft that validates. When the bound is reached
    /// the last draft is returned with `validated == false`.
    pub async fn generate(
        &self,
        prompts: &PromptSet,
        description: &str,
        layout: &ModuleLayout,
        observer: &dyn AttemptObserver,
    ) -> CoreResult<GenerationOutcome> {
        let mut request = prompts.generation_request(description);
        let mut content = String::new();
        let mut last_error = None;
        let mut attempt = 0;

        while attempt < self.max_attempts {
            attempt += 1;
            observer.on_attempt_started(attempt, self.max_attempts);
            info!(
                "Generating module (attempt {}/{}) with {}",
                attempt,
                self.max_attempts,
                self.client.model()
            );

            content = strip_code_fences(&self.client.complete(&request).await?);
            layout.write_draft(&content)?;

            let report = self.validator.validate(layout.temp_dir()).await?;
            if report.passed {
                info!("Module validated on attempt {}", attempt);
                let outcome = GenerationOutcome {
                    content,
                    attempts: attempt,
                    validated: true,
                    last_error: None,
                };
                observer.on_generation_finished(&outcome);
                return Ok(outcome);
            }

            let error_text = report
                .error_text()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or("validation failed without output")
                .to_string();
            warn!("Validation of attempt {} failed", attempt);

            observer.on_validation_failed(&AttemptFailure {
                attempt,
                max_attempts: self.max_attempts,
                error_text: &error_text,
                draft_dir: layout.temp_dir(),
            })?;

            request = prompts.correction_request(&error_text, &content);
            last_error = Some(error_text);
        }

        warn!(
            "No valid module after {} attempts, continuing with the last draft",
            attempt
        );
        let outcome = GenerationOutcome {
            content,
            attempts: attempt,
            validated: false,
            last_error,
        };
        observer.on_generation_finished(&outcome);
        Ok(outcome)
    }
}
