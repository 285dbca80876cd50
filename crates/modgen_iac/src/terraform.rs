//! Terraform command runner.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use modgen_runner::{CommandConfig, CommandRunner};

use crate::error::{IacError, IacResult};

/// Result of a Terraform operation.
#[derive(Debug)]
pub struct TerraformResult {
    pub success: bool,
    pub output: String,
    /// Error stream, falling back to combined output when stderr is empty.
    pub error_output: String,
    pub exit_code: i64,
}

/// Terraform runner that executes commands through a [`CommandRunner`].
pub struct TerraformRunner {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    timeout_seconds: u64,
}

impl TerraformRunner {
    /// Create a new Terraform runner using the `terraform` binary.
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: "terraform".to_string(),
            timeout_seconds: 0,
        }
    }

    /// Use a custom Terraform-compatible binary (e.g. `tofu`).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Bound every command by a timeout (0 disables it).
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Fail early when the binary (or its container runtime) cannot run.
    pub async fn ensure_available(&self) -> IacResult<()> {
        if self.runner.is_available(&self.binary).await? {
            Ok(())
        } else {
            Err(IacError::TerraformNotAvailable(format!(
                "`{}` could not be executed via {}",
                self.binary,
                self.runner.describe()
            )))
        }
    }

    /// Run terraform init.
    pub async fn init(&self, working_dir: &Path) -> IacResult<TerraformResult> {
        info!("Running terraform init in {:?}", working_dir);
        self.run_command(working_dir, &["init", "-input=false", "-no-color"])
            .await
    }

    /// Run terraform validate.
    pub async fn validate(&self, working_dir: &Path) -> IacResult<TerraformResult> {
        info!("Running terraform validate in {:?}", working_dir);
        self.run_command(working_dir, &["validate", "-no-color"]).await
    }

    /// Run terraform fmt to format files in place.
    pub async fn fmt(&self, working_dir: &Path) -> IacResult<TerraformResult> {
        info!("Running terraform fmt in {:?}", working_dir);
        self.run_command(working_dir, &["fmt", "-no-color"]).await
    }

    /// First line of `terraform version`, e.g. `Terraform v1.6.6`.
    pub async fn version(&self, working_dir: &Path) -> IacResult<String> {
        let result = self.run_command(working_dir, &["version"]).await?;
        Ok(result.output.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn run_command(&self, working_dir: &Path, args: &[&str]) -> IacResult<TerraformResult> {
        if !working_dir.is_dir() {
            return Err(IacError::DirectoryNotFound(
                working_dir.display().to_string(),
            ));
        }

        let config = CommandConfig::new(&self.binary)
            .args(args.iter().copied())
            .workdir(working_dir)
            .env("TF_IN_AUTOMATION", "1")
            .timeout(self.timeout_seconds);

        debug!("Executing terraform {:?} via {}", args, self.runner.describe());

        let result = self.runner.run(&config).await?;

        Ok(TerraformResult {
            success: result.success(),
            output: result.combined_output(),
            error_output: result.error_output(),
            exit_code: result.exit_code,
        })
    }
}
