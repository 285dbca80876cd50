//! CLI-based container runner supporting Docker and Podman.
//!
//! Commands run inside an image whose entrypoint is the target program (for
//! example `hashicorp/terraform`), with the host working directory mounted at
//! `/workspace`.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::CommandConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::local::execute;
use crate::runner::{CommandRunner, ExecutionResult};

const CONTAINER_WORKDIR: &str = "/workspace";

/// Container runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    Docker,
    Podman,
}

impl ContainerRuntime {
    /// Get the CLI command name.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Podman => "podman",
        }
    }
}

impl std::fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command())
    }
}

/// Runner that executes commands through `docker run` / `podman run`.
pub struct ContainerCliRunner {
    runtime: ContainerRuntime,
    image: String,
    tag: String,
}

impl ContainerCliRunner {
    /// Create a runner with a specific runtime.
    pub fn with_runtime(
        runtime: ContainerRuntime,
        image: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            image: image.into(),
            tag: tag.into(),
        }
    }

    /// Create a runner, detecting the runtime when none is preferred.
    pub async fn detect(
        preferred: Option<ContainerRuntime>,
        image: impl Into<String>,
        tag: impl Into<String>,
    ) -> RunnerResult<Self> {
        let runtime = Self::detect_runtime(preferred).await?;
        info!("Using container runtime: {}", runtime);
        Ok(Self::with_runtime(runtime, image, tag))
    }

    /// Detect available container runtime.
    pub async fn detect_runtime(
        preferred: Option<ContainerRuntime>,
    ) -> RunnerResult<ContainerRuntime> {
        if let Some(preferred) = preferred {
            if Self::is_runtime_available(preferred).await {
                return Ok(preferred);
            }
            warn!(
                "Preferred runtime {} not available, trying alternatives",
                preferred
            );
        }

        for runtime in [ContainerRuntime::Docker, ContainerRuntime::Podman] {
            if Self::is_runtime_available(runtime).await {
                return Ok(runtime);
            }
        }

        Err(RunnerError::RuntimeNotAvailable(
            "Neither Docker nor Podman is available".to_string(),
        ))
    }

    async fn is_runtime_available(runtime: ContainerRuntime) -> bool {
        Command::new(runtime.command())
            .arg("version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Get the current runtime.
    pub fn runtime(&self) -> ContainerRuntime {
        self.runtime
    }

    /// Full image reference (`image:tag`).
    pub fn full_image(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    /// Build the `run` arguments for a command.
    fn build_run_args(&self, config: &CommandConfig) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];

        args.push("--name".to_string());
        args.push(format!("modgen-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]));

        args.push("-v".to_string());
        args.push(format!(
            "{}:{}",
            config.workdir.to_string_lossy(),
            CONTAINER_WORKDIR
        ));

        args.push("-w".to_string());
        args.push(CONTAINER_WORKDIR.to_string());

        let mut env: Vec<_> = config.env.iter().collect();
        env.sort();
        for (key, value) in env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }

        args.push(self.full_image());
        args.extend(config.args.iter().cloned());

        args
    }
}

#[async_trait]
impl CommandRunner for ContainerCliRunner {
    async fn is_available(&self, _program: &str) -> RunnerResult<bool> {
        Ok(Self::is_runtime_available(self.runtime).await)
    }

    async fn run(&self, config: &CommandConfig) -> RunnerResult<ExecutionResult> {
        let workdir = std::fs::canonicalize(&config.workdir)?;
        let config = config.clone().workdir(workdir);
        let args = self.build_run_args(&config);

        let command_line = CommandConfig::new(self.runtime.command())
            .args(args.iter().cloned())
            .display();

        info!(
            "Running {} in container {}",
            config.program,
            self.full_image()
        );

        let mut cmd = Command::new(self.runtime.command());
        cmd.args(&args);
        execute(cmd, &command_line, config.timeout_seconds).await
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.runtime, self.full_image())
    }
}
