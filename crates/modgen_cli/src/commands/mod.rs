//! CLI command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod generate;
pub mod validate;

/// modgen - draft Terraform modules with an LLM and terraform validate
#[derive(Parser)]
#[command(name = "modgen")]
#[command(version, about = "Draft reusable Terraform modules from a description")]
#[command(long_about = r#"
modgen asks a language model for a Terraform module, validates the draft with
`terraform init` + `terraform validate`, feeds any errors back to the model and
retries (5 attempts by default). The accepted module is split into main.tf,
variables.tf, outputs.tf and README.md inside generated_module_<timestamp>/.

COMMANDS:
  generate  → Draft, validate and write a new module
  validate  → Run terraform validation on an existing module directory

ENVIRONMENT:
  OPENAI_API_KEY / ANTHROPIC_API_KEY  LLM credential (required for generate)
  MODGEN_LLM_MODEL                    Model override
  MODGEN_LLM_BASE_URL                 API base URL override
  MODGEN_MAX_ATTEMPTS                 Attempt bound

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or configuration
  3 - Validation failure
  5 - IaC error
  6 - LLM credential missing
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (defaults to ./modgen.toml when present)
    #[arg(long, global = true, env = "MODGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new Terraform module
    Generate(generate::GenerateArgs),

    /// Validate an existing module directory
    Validate(validate::ValidateArgs),
}
