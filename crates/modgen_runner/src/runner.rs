//! Command runner trait and types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CommandConfig;
use crate::error::RunnerResult;

/// Result of a command execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Command line as it was executed
    pub command: String,
    /// Exit code (-1 when terminated by a signal)
    pub exit_code: i64,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
    /// Execution start time
    pub started_at: DateTime<Utc>,
    /// Execution end time
    pub finished_at: DateTime<Utc>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Check if execution was successful (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Get combined output (stdout + stderr).
    pub fn combined_output(&self) -> String {
        if self.stdout.is_empty() {
            self.stderr.clone()
        } else if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// The error stream, or the combined output when stderr is empty.
    pub fn error_output(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.combined_output()
        } else {
            self.stderr.clone()
        }
    }
}

/// Command runner trait.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Check if the program (or the runtime hosting it) can be executed.
    async fn is_available(&self, program: &str) -> RunnerResult<bool>;

    /// Run a command to completion and capture its output.
    async fn run(&self, config: &CommandConfig) -> RunnerResult<ExecutionResult>;

    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(stdout: &str, stderr: &str, exit_code: i64) -> ExecutionResult {
        let now = Utc::now();
        ExecutionResult {
            command: "terraform validate".to_string(),
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            started_at: now,
            finished_at: now,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_combined_output() {
        assert_eq!(result("out", "", 0).combined_output(), "out");
        assert_eq!(result("", "err", 1).combined_output(), "err");
        assert_eq!(result("out", "err", 1).combined_output(), "out\nerr");
    }

    #[test]
    fn test_error_output_prefers_stderr() {
        assert_eq!(result("out", "Error: bad", 1).error_output(), "Error: bad");
        assert_eq!(result("Error on stdout", "\n", 1).error_output(), "Error on stdout\n\n");
    }

    #[test]
    fn test_success() {
        assert!(result("", "", 0).success());
        assert!(!result("", "", 1).success());
    }
}
