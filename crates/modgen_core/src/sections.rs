//! Splitting an accepted module into conventional files.

use std::sync::Arc;

use tracing::info;

use modgen_llm::CompletionClient;

use crate::error::CoreResult;
use crate::prompts::PromptSet;
use crate::sanitize::strip_code_fences;

/// The four files of a finished module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSections {
    /// Providers, resources and locals (`main.tf`)
    pub resources: String,
    /// Variable declarations (`variables.tf`)
    pub variables: String,
    /// Output declarations (`outputs.tf`)
    pub outputs: String,
    /// Documentation (`README.md`)
    pub readme: String,
}

/// Asks the model to partition a module and document it.
pub struct SectionSplitter {
    client: Arc<dyn CompletionClient>,
}

impl SectionSplitter {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Issue the resources, variables, outputs and README requests, in that
    /// order.
    pub async fn split(&self, prompts: &PromptSet, module: &str) -> CoreResult<ModuleSections> {
        info!("Extracting resources section");
        let resources = self.client.complete(&prompts.resources_request(module)).await?;

        info!("Extracting variables section");
        let variables = self.client.complete(&prompts.variables_request(module)).await?;

        info!("Extracting outputs section");
        let outputs = self.client.complete(&prompts.outputs_request(module)).await?;

        info!("Generating README");
        let readme = self.client.complete(&prompts.readme_request(module)).await?;

        Ok(ModuleSections {
            resources: strip_code_fences(&resources),
            variables: strip_code_fences(&variables),
            outputs: strip_code_fences(&outputs),
            readme: readme.trim().to_string(),
        })
    }
}
