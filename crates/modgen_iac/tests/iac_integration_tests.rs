//! Integration tests for Terraform validation.

use std::fs;
use std::sync::Arc;

use modgen_iac::{ModuleValidator, TerraformRunner, TerraformValidator};
use modgen_runner::{MockResponse, MockRunner};
use tempfile::tempdir;

fn validator(mock: &MockRunner) -> TerraformValidator {
    TerraformValidator::new(TerraformRunner::new(Arc::new(mock.clone())))
}

#[tokio::test]
async fn test_validate_success_runs_init_then_validate() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("generated_module.tf"),
        "resource \"null_resource\" \"x\" {}",
    )
    .unwrap();
    let mock = MockRunner::new().with_responses(vec![
        MockResponse::success("Terraform has been successfully initialized!"),
        MockResponse::success("Success! The configuration is valid."),
    ]);

    let report = validator(&mock).validate(dir.path()).await.unwrap();

    assert!(report.passed);
    assert_eq!(report.checks.len(), 2);
    let calls = mock.get_calls();
    assert_eq!(calls[0].args[0], "init");
    assert_eq!(calls[1].args[0], "validate");
}

#[tokio::test]
async fn test_init_failure_skips_validate() {
    let dir = tempdir().unwrap();
    let mock = MockRunner::new().add_response(MockResponse::failure(
        1,
        "Error: Failed to query available provider packages",
    ));

    let report = validator(&mock).validate(dir.path()).await.unwrap();

    assert!(!report.passed);
    assert_eq!(
        report.error_text(),
        Some("Error: Failed to query available provider packages")
    );
    assert_eq!(mock.call_count(), 1);
    assert!(mock.calls_for("validate").is_empty());
}

#[tokio::test]
async fn test_validate_failure_reports_stderr() {
    let dir = tempdir().unwrap();
    let mock = MockRunner::new().with_responses(vec![
        MockResponse::success("initialized"),
        MockResponse::failure(1, "Error: Reference to undeclared input variable"),
    ]);

    let report = validator(&mock).validate(dir.path()).await.unwrap();

    assert!(!report.passed);
    assert_eq!(report.checks[0].name, "init");
    assert!(report.checks[0].passed);
    assert_eq!(
        report.error_text(),
        Some("Error: Reference to undeclared input variable")
    );
}

#[tokio::test]
async fn test_runner_error_propagates() {
    let dir = tempdir().unwrap();
    let mock = MockRunner::new().simulate_failure("terraform: command not found");

    let result = validator(&mock).validate(dir.path()).await;

    assert!(result.is_err());
}
