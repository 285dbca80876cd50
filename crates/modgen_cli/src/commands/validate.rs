//! Validate command - Run terraform init + validate on an existing module.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use modgen_core::{ModgenConfig, RuntimeKind};
use modgen_iac::{ModuleValidator, TerraformRunner, TerraformValidator};

use super::generate::parse_runtime;

#[derive(Args)]
pub struct ValidateArgs {
    /// Module directory to validate
    pub dir: PathBuf,

    /// Where terraform runs: local, docker or podman
    #[arg(long, value_parser = parse_runtime)]
    pub runtime: Option<RuntimeKind>,
}

/// Returned when the module does not pass validation.
#[derive(thiserror::Error, Debug)]
#[error("Module validation failed")]
pub struct ValidationFailed;

pub async fn execute(args: ValidateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = ModgenConfig::load(config_path).context("Failed to load configuration")?;
    if let Some(runtime) = args.runtime {
        config.terraform.runtime = runtime;
    }

    if !args.dir.is_dir() {
        anyhow::bail!("Module directory not found: {}", args.dir.display());
    }
    info!("Validating module in {:?}", args.dir);

    let terraform = TerraformRunner::new(config.terraform.build_runner().await?)
        .with_binary(&config.terraform.binary)
        .with_timeout(config.terraform.timeout_seconds);
    terraform.ensure_available().await?;

    match terraform.version(&args.dir).await {
        Ok(version) => println!("🔍 Validating {} with {}...", args.dir.display(), version),
        Err(_) => println!("🔍 Validating {}...", args.dir.display()),
    }
    let report = TerraformValidator::new(terraform).validate(&args.dir).await?;

    for check in &report.checks {
        if check.passed {
            println!("   ✅ {}", check.name);
        } else {
            println!("   ❌ {}:", check.name);
            for line in check.message.lines() {
                println!("      {}", line);
            }
        }
    }

    if report.passed {
        println!("\n✅ Module is valid");
        Ok(())
    } else {
        Err(ValidationFailed.into())
    }
}
