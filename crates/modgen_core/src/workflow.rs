//! End-to-end module generation run.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use modgen_iac::{ModuleValidator, TerraformRunner};
use modgen_llm::CompletionClient;

use crate::error::CoreResult;
use crate::generator::{AttemptObserver, ModuleGenerator, DEFAULT_MAX_ATTEMPTS};
use crate::output::ModuleLayout;
use crate::prompts::{ModuleRequest, PromptSet};
use crate::sections::SectionSplitter;

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub output_dir: PathBuf,
    pub draft_path: PathBuf,
    pub attempts: u32,
    pub validated: bool,
    pub last_error: Option<String>,
    /// Files written, in `main.tf`, `variables.tf`, `outputs.tf`, `README.md` order
    pub files: Vec<PathBuf>,
}

/// Generate → validate → split → write.
pub struct ModuleWorkflow {
    client: Arc<dyn CompletionClient>,
    validator: Arc<dyn ModuleValidator>,
    formatter: Option<Arc<TerraformRunner>>,
    output_root: PathBuf,
    max_attempts: u32,
}

impl ModuleWorkflow {
    pub fn new(client: Arc<dyn CompletionClient>, validator: Arc<dyn ModuleValidator>) -> Self {
        Self {
            client,
            validator,
            formatter: None,
            output_root: PathBuf::from("."),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Run `terraform fmt` over the written files.
    pub fn with_formatter(mut self, terraform: Arc<TerraformRunner>) -> Self {
        self.formatter = Some(terraform);
        self
    }

    pub async fn run(
        &self,
        request: &ModuleRequest,
        observer: &dyn AttemptObserver,
    ) -> CoreResult<WorkflowReport> {
        let layout = ModuleLayout::create(&self.output_root, &Local::now())?;
        info!(
            "Generating {} module into {:?}",
            request.provider,
            layout.output_dir()
        );

        let prompts = PromptSet::for_provider(&request.provider);

        let generator = ModuleGenerator::new(self.client.clone(), self.validator.clone())
            .with_max_attempts(self.max_attempts);
        let outcome = generator
            .generate(&prompts, &request.description, &layout, observer)
            .await?;

        let sections = SectionSplitter::new(self.client.clone())
            .split(&prompts, &outcome.content)
            .await?;
        let files = layout.write_sections(&sections)?;

        if let Some(terraform) = &self.formatter {
            // Unvalidated drafts may not parse; formatting is best effort.
            match terraform.fmt(layout.output_dir()).await {
                Ok(result) if !result.success => {
                    warn!("terraform fmt failed: {}", result.error_output.trim())
                }
                Ok(_) => {}
                Err(e) => warn!("terraform fmt could not run: {}", e),
            }
        }

        info!("Module written to {:?}", layout.output_dir());

        Ok(WorkflowReport {
            output_dir: layout.output_dir().to_path_buf(),
            draft_path: layout.draft_path(),
            attempts: outcome.attempts,
            validated: outcome.validated,
            last_error: outcome.last_error,
            files,
        })
    }
}
