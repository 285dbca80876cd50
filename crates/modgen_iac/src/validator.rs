//! Module validation.

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::IacResult;
use crate::terraform::TerraformRunner;

/// Something that can tell whether a directory holds a valid module.
#[async_trait]
pub trait ModuleValidator: Send + Sync {
    /// Validate the module in `dir`.
    ///
    /// A module that fails validation yields `Ok` with a failing report;
    /// `Err` means validation could not be carried out.
    async fn validate(&self, dir: &Path) -> IacResult<ValidationReport>;
}

/// Validator backed by `terraform init` + `terraform validate`.
pub struct TerraformValidator {
    runner: TerraformRunner,
}

impl TerraformValidator {
    pub fn new(runner: TerraformRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &TerraformRunner {
        &self.runner
    }
}

#[async_trait]
impl ModuleValidator for TerraformValidator {
    async fn validate(&self, dir: &Path) -> IacResult<ValidationReport> {
        info!("Validating module at {:?}", dir);
        let mut report = ValidationReport::new();

        // Initialize (required before validate)
        let init_result = self.runner.init(dir).await?;
        if !init_result.success {
            warn!("terraform init failed with exit code {}", init_result.exit_code);
            report.add_check("init", false, &init_result.error_output);
            return Ok(report);
        }
        report.add_check("init", true, "Initialization successful");

        let validate_result = self.runner.validate(dir).await?;
        if validate_result.success {
            report.add_check("validate", true, &validate_result.output);
        } else {
            warn!(
                "terraform validate failed with exit code {}",
                validate_result.exit_code
            );
            report.add_check("validate", false, &validate_result.error_output);
        }

        Ok(report)
    }
}

/// Validation report for a module.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub checks: Vec<ValidationCheck>,
    pub passed: bool,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            passed: true,
        }
    }

    pub fn add_check(&mut self, name: &str, passed: bool, message: &str) {
        if !passed {
            self.passed = false;
        }
        self.checks.push(ValidationCheck {
            name: name.to_string(),
            passed,
            message: message.to_string(),
        });
    }

    /// Message of the first failing check.
    pub fn error_text(&self) -> Option<&str> {
        self.checks
            .iter()
            .find(|c| !c.passed)
            .map(|c| c.message.as_str())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tracks_failures() {
        let mut report = ValidationReport::new();
        assert!(report.passed);
        assert_eq!(report.error_text(), None);

        report.add_check("init", true, "ok");
        report.add_check("validate", false, "Error: Missing required argument");

        assert!(!report.passed);
        assert_eq!(report.error_text(), Some("Error: Missing required argument"));
    }
}
