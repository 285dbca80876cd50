//! # modgen_core
//!
//! The module generation workflow: build prompts, ask the model for a
//! Terraform module, validate it, feed validation errors back until the
//! module validates or the attempt bound is reached, then split the result
//! into `main.tf`, `variables.tf`, `outputs.tf` and `README.md`.
//!
//! ```text
//! ModuleRequest ──▶ PromptSet ──▶ ModuleGenerator ──▶ SectionSplitter ──▶ ModuleLayout
//!                                   │      ▲
//!                                   ▼      │ error text
//!                             ModuleValidator
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod prompts;
pub mod sanitize;
pub mod sections;
pub mod workflow;

pub use config::{LlmConfig, ModgenConfig, RuntimeKind, TerraformConfig};
pub use error::{CoreError, CoreResult};
pub use generator::{
    AttemptFailure, AttemptObserver, GenerationOutcome, ModuleGenerator, SilentObserver,
};
pub use output::ModuleLayout;
pub use prompts::{ModuleRequest, PromptSet};
pub use sanitize::strip_code_fences;
pub use sections::{ModuleSections, SectionSplitter};
pub use workflow::{ModuleWorkflow, WorkflowReport};
