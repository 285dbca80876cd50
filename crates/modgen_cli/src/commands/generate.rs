//! Generate command - Draft, validate and write a Terraform module.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use modgen_core::{ModgenConfig, ModuleRequest, ModuleWorkflow, RuntimeKind};
use modgen_iac::{TerraformRunner, TerraformValidator};
use modgen_llm::{Credentials, LlmAdapter};

use crate::interaction::{self, ConsoleObserver};

#[derive(Args)]
pub struct GenerateArgs {
    /// Terraform provider(s) the module targets (asked interactively if omitted)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Description of the resources (asked interactively if omitted)
    #[arg(short, long)]
    pub description: Option<String>,

    /// Directory receiving generated_module_<timestamp>/
    #[arg(short, long, env = "MODGEN_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum generate/validate attempts
    #[arg(long, env = "MODGEN_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Model to request
    #[arg(long, env = "MODGEN_LLM_MODEL")]
    pub model: Option<String>,

    /// API base URL override
    #[arg(long, env = "MODGEN_LLM_BASE_URL")]
    pub base_url: Option<String>,

    /// Do not wait for Enter after a failed attempt
    #[arg(long)]
    pub no_pause: bool,

    /// Run terraform fmt on the written module
    #[arg(long)]
    pub fmt: bool,

    /// Where terraform runs: local, docker or podman
    #[arg(long, value_parser = parse_runtime)]
    pub runtime: Option<RuntimeKind>,
}

impl GenerateArgs {
    /// Overlay command-line values on the loaded configuration.
    pub fn apply(&self, config: &mut ModgenConfig) -> Result<()> {
        if let Some(dir) = &self.output_dir {
            config.output_root = dir.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = max_attempts;
        }
        if let Some(model) = &self.model {
            config.llm.model = Some(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.llm.base_url = Some(base_url.clone());
        }
        if self.no_pause {
            config.pause_between_attempts = false;
        }
        if self.fmt {
            config.format_output = true;
        }
        if let Some(runtime) = self.runtime {
            config.terraform.runtime = runtime;
        }
        config.validate().context("Invalid configuration")?;
        Ok(())
    }
}

pub(crate) fn parse_runtime(value: &str) -> std::result::Result<RuntimeKind, String> {
    RuntimeKind::parse(value)
        .ok_or_else(|| format!("unknown runtime '{}' (expected local, docker or podman)", value))
}

pub async fn execute(args: GenerateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = ModgenConfig::load(config_path).context("Failed to load configuration")?;
    args.apply(&mut config)?;

    // Nothing is asked or sent before a credential is known to exist.
    let credentials =
        Credentials::from_env(config.llm.provider).context("Cannot contact the LLM")?;
    info!("Using {} credentials", credentials.provider());

    let command_runner = config.terraform.build_runner().await?;
    let terraform_runner = || {
        TerraformRunner::new(command_runner.clone())
            .with_binary(&config.terraform.binary)
            .with_timeout(config.terraform.timeout_seconds)
    };
    let terraform = Arc::new(terraform_runner());
    terraform.ensure_available().await?;

    let provider = match args.provider {
        Some(provider) => provider,
        None => interaction::ask("Which Terraform provider(s) are you using?")?,
    };
    let description = match args.description {
        Some(description) => description,
        None => interaction::ask(
            "Enter a description of the resources you need in the module and any other relevant details.",
        )?,
    };
    let request = ModuleRequest::new(provider, description)?;

    let client = Arc::new(LlmAdapter::new(credentials, config.llm.settings()));
    let validator = Arc::new(TerraformValidator::new(terraform_runner()));

    let mut workflow = ModuleWorkflow::new(client, validator)
        .with_output_root(&config.output_root)
        .with_max_attempts(config.max_attempts);
    if config.format_output {
        workflow = workflow.with_formatter(terraform);
    }

    let observer = ConsoleObserver::new(config.pause_between_attempts);
    let report = workflow.run(&request, &observer).await?;

    println!(
        "Terraform module generated and saved to {}",
        report.output_dir.display()
    );
    if !report.validated {
        info!(
            "Module left unvalidated after {} attempts: {}",
            report.attempts,
            report.last_error.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}
