//! Runner that executes programs directly on the host.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::config::CommandConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandRunner, ExecutionResult};

/// Runner for locally installed binaries.
#[derive(Debug, Clone, Default)]
pub struct LocalRunner;

impl LocalRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    async fn is_available(&self, program: &str) -> RunnerResult<bool> {
        let status = Command::new(program)
            .arg("version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        Ok(status.map(|s| s.success()).unwrap_or(false))
    }

    async fn run(&self, config: &CommandConfig) -> RunnerResult<ExecutionResult> {
        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .current_dir(&config.workdir)
            .envs(&config.env);

        info!("Running {} in {:?}", config.program, config.workdir);
        execute(cmd, &config.display(), config.timeout_seconds).await
    }

    fn describe(&self) -> String {
        "local".to_string()
    }
}

/// Spawn `cmd`, wait for it (bounded by `timeout_seconds` when non-zero) and
/// capture both output streams.
pub(crate) async fn execute(
    mut cmd: Command,
    command_line: &str,
    timeout_seconds: u64,
) -> RunnerResult<ExecutionResult> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("Executing: {}", command_line);

    let program = command_line.split_whitespace().next().unwrap_or_default().to_string();
    let child = cmd.spawn().map_err(|source| RunnerError::Spawn {
        program: program.clone(),
        source,
    })?;

    let started_at = Utc::now();
    let waited = if timeout_seconds > 0 {
        let limit = Duration::from_secs(timeout_seconds);
        match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(waited) => waited,
            Err(_) => return Err(RunnerError::Timeout(timeout_seconds)),
        }
    } else {
        child.wait_with_output().await
    };
    let output = waited.map_err(|e| {
        RunnerError::ExecutionFailed(format!("Failed to wait for {}: {}", program, e))
    })?;
    let finished_at = Utc::now();

    let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
    let exit_code = output.status.code().unwrap_or(-1) as i64;

    if exit_code == 0 {
        debug!("{} completed successfully in {}ms", program, duration_ms);
    } else {
        error!(
            "{} failed with exit code {} after {}ms",
            program, exit_code, duration_ms
        );
    }

    Ok(ExecutionResult {
        command: command_line.to_string(),
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        started_at,
        finished_at,
        duration_ms,
    })
}
