//! Prompt construction.
//!
//! All prompts are plain string templates. The same provider and
//! description always produce byte-identical prompts.

use modgen_llm::CompletionRequest;

use crate::error::{CoreError, CoreResult};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRequest {
    /// Terraform provider(s), free text (e.g. "aws", "azurerm and random")
    pub provider: String,
    /// Natural-language description of the resources
    pub description: String,
}

impl ModuleRequest {
    pub fn new(provider: impl Into<String>, description: impl Into<String>) -> CoreResult<Self> {
        let provider = provider.into().trim().to_string();
        let description = description.into().trim().to_string();

        if provider.is_empty() {
            return Err(CoreError::InvalidRequest("provider must not be empty".to_string()));
        }
        if description.is_empty() {
            return Err(CoreError::InvalidRequest(
                "resource description must not be empty".to_string(),
            ));
        }

        Ok(Self {
            provider,
            description,
        })
    }
}

const HCL_ONLY_RULES: &str = "Your response must be in HCL format only. \
It will be consumed and placed directly into a .tf file. \
Do not use markdown code fences (```) or any other formatting symbols. \
Provide only the plain Terraform code. \
Include complete code for providers, resources, locals (if helpful), variables, and outputs. \
Include helpful descriptions for every variable and output. \
Include helpful comments with recommendations, as needed. \
Make sure the code you provide is accurate and lines up with the latest Terraform version. ";

const GENERATION_RULES: &str = "Be sure to include any encryption keys and roles or policies needed with the configuration. \
Use variables to drive all resource inputs, with logical defaults. \
If a resource type typically has child resources, include those. \
An example would be Aurora clusters requiring instances, etc. \
If security groups or similar resources are part of the module, define them with validated variables \
and allow the user to pass in their own custom rules.";

/// The three system prompts used during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    base: String,
    generation: String,
    extraction: String,
}

impl PromptSet {
    pub fn for_provider(provider: &str) -> Self {
        let base = format!(
            "You are a Terraform expert. \
You have extensive experience converting Terraform resources into reusable modules. \
Your expertise is specific to the {} provider. \
You care deeply about creating modules that are easy to use and understand. ",
            provider
        );
        let generation = format!("{}{}{}", base, HCL_ONLY_RULES, GENERATION_RULES);
        let extraction = format!("{}{}", base, HCL_ONLY_RULES).trim_end().to_string();

        Self {
            base: base.trim_end().to_string(),
            generation,
            extraction,
        }
    }

    /// Persona shared by every request; used alone for documentation.
    pub fn base_system(&self) -> &str {
        &self.base
    }

    /// System prompt for drafting the full module.
    pub fn generation_system(&self) -> &str {
        &self.generation
    }

    /// System prompt for pulling sections out of an accepted module.
    pub fn extraction_system(&self) -> &str {
        &self.extraction
    }

    pub fn generation_request(&self, description: &str) -> CompletionRequest {
        CompletionRequest::new(&self.generation, generation_prompt(description))
    }

    pub fn correction_request(&self, error_text: &str, previous: &str) -> CompletionRequest {
        CompletionRequest::new(&self.generation, correction_prompt(error_text, previous))
    }

    pub fn resources_request(&self, module: &str) -> CompletionRequest {
        CompletionRequest::new(
            &self.extraction,
            format!(
                "Pull out and return only the providers, resources, and any locals found in this module. \
Include the comments, but remove the variables and outputs: \n\n{}",
                module
            ),
        )
    }

    pub fn variables_request(&self, module: &str) -> CompletionRequest {
        CompletionRequest::new(
            &self.extraction,
            format!(
                "Pull out and return only the variables found in this module. \
Include the comments, but remove the resources, locals, and outputs: \n\n{}",
                module
            ),
        )
    }

    pub fn outputs_request(&self, module: &str) -> CompletionRequest {
        CompletionRequest::new(
            &self.extraction,
            format!(
                "Pull out and return only the outputs found in this module. \
Include the comments, but remove the resources, locals, and variables: \n\n{}",
                module
            ),
        )
    }

    pub fn readme_request(&self, module: &str) -> CompletionRequest {
        CompletionRequest::new(
            &self.base,
            format!(
                "Given the following Terraform module code, give me a full README.md. \
Along with detailed Terraform README content, provide 2 example uses of the module. \
One example should use all the default values for the variables. \
One example should use every input available. \
Your response should not include anything other than the actual README.md content. \
Do not include markdown code fences (```) for markdown itself, only code inside the content.\n\n{}",
                module
            ),
        )
    }
}

/// First user prompt of a run.
pub fn generation_prompt(description: &str) -> String {
    format!(
        "Create a Terraform module with the following resources and any other logically related resources I might need: {}.",
        description
    )
}

/// Follow-up prompt after a failed validation. Only the error text and the
/// previous draft are carried forward.
pub fn correction_prompt(error_text: &str, previous: &str) -> String {
    format!(
        "The following Terraform validation errors occurred: {}. \
Please regenerate the Terraform code, correcting these errors. \n{}",
        error_text.trim(),
        previous
    )
}
