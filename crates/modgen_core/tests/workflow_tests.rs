//! Integration tests for the generation workflow.

use std::fs;
use std::sync::{Arc, Mutex};

use modgen_core::{
    AttemptFailure, AttemptObserver, CoreResult, GenerationOutcome, ModuleRequest, ModuleWorkflow,
    SilentObserver,
};
use modgen_iac::{TerraformRunner, TerraformValidator};
use modgen_llm::MockCompletionClient;
use modgen_runner::{MockResponse, MockRunner};
use tempfile::tempdir;

const MODULE: &str = r#"resource "aws_s3_bucket" "this" {
  bucket = var.name
}

variable "name" {
  description = "Bucket name"
  type        = string
}

output "arn" {
  value = aws_s3_bucket.this.arn
}"#;

fn request() -> ModuleRequest {
    ModuleRequest::new("aws", "an S3 bucket with versioning").unwrap()
}

fn validator(runner: &MockRunner) -> Arc<TerraformValidator> {
    Arc::new(TerraformValidator::new(TerraformRunner::new(Arc::new(
        runner.clone(),
    ))))
}

/// Runner where `init` succeeds and `validate` always fails.
fn always_invalid() -> MockRunner {
    MockRunner::new().with_responses(vec![
        MockResponse::success("Terraform has been successfully initialized!"),
        MockResponse::failure(1, "Error: Unsupported argument"),
    ])
}

/// LLM that answers every generation with MODULE and then the four sections.
fn scripted_llm(generations: usize) -> MockCompletionClient {
    let mut client = MockCompletionClient::new();
    for _ in 0..generations {
        client = client.add_response(MODULE);
    }
    client
        .add_response("resource \"aws_s3_bucket\" \"this\" {}")
        .add_response("variable \"name\" {}")
        .add_response("output \"arn\" {}")
        .add_response("# S3 module")
}

#[derive(Default)]
struct RecordingObserver {
    started: Mutex<Vec<u32>>,
    failures: Mutex<Vec<(u32, u32, String)>>,
    finished: Mutex<Option<(u32, bool)>>,
}

impl AttemptObserver for RecordingObserver {
    fn on_attempt_started(&self, attempt: u32, _max_attempts: u32) {
        self.started.lock().unwrap().push(attempt);
    }

    fn on_validation_failed(&self, failure: &AttemptFailure<'_>) -> CoreResult<()> {
        assert!(failure.draft_dir.join("generated_module.tf").exists());
        self.failures.lock().unwrap().push((
            failure.attempt,
            failure.attempts_remaining(),
            failure.error_text.to_string(),
        ));
        Ok(())
    }

    fn on_generation_finished(&self, outcome: &GenerationOutcome) {
        *self.finished.lock().unwrap() = Some((outcome.attempts, outcome.validated));
    }
}

#[tokio::test]
async fn test_valid_first_draft_writes_module() {
    let root = tempdir().unwrap();
    let runner = MockRunner::new();
    let llm = scripted_llm(1);
    let workflow = ModuleWorkflow::new(Arc::new(llm.clone()), validator(&runner))
        .with_output_root(root.path());

    let report = workflow.run(&request(), &SilentObserver).await.unwrap();

    assert!(report.validated);
    assert_eq!(report.attempts, 1);
    assert_eq!(llm.request_count(), 5);
    assert_eq!(runner.calls_for("init").len(), 1);
    assert_eq!(runner.calls_for("validate").len(), 1);

    let names: Vec<_> = report
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["main.tf", "variables.tf", "outputs.tf", "README.md"]);
    assert_eq!(
        fs::read_to_string(report.output_dir.join("README.md")).unwrap(),
        "# S3 module\n"
    );
    assert_eq!(fs::read_to_string(&report.draft_path).unwrap(), MODULE);
    assert!(report
        .output_dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("generated_module_"));
}

#[tokio::test]
async fn test_always_failing_validator_uses_exact_bound() {
    let root = tempdir().unwrap();
    let runner = always_invalid();
    let llm = scripted_llm(5);
    let observer = RecordingObserver::default();
    let workflow = ModuleWorkflow::new(Arc::new(llm.clone()), validator(&runner))
        .with_output_root(root.path())
        .with_max_attempts(5);

    let report = workflow.run(&request(), &observer).await.unwrap();

    assert!(!report.validated);
    assert_eq!(report.attempts, 5);
    assert_eq!(report.last_error.as_deref(), Some("Error: Unsupported argument"));

    // Five generation requests, then the four section requests
    let requests = llm.requests();
    assert_eq!(requests.len(), 9);
    assert!(requests[1..5]
        .iter()
        .all(|r| r.user.starts_with("The following Terraform validation errors occurred")));
    assert_eq!(runner.calls_for("validate").len(), 5);

    // Output still produced from the unvalidated draft
    for file in &report.files {
        assert!(file.exists(), "{:?} missing", file);
    }
    assert_eq!(report.files.len(), 4);

    assert_eq!(*observer.started.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    let failures = observer.failures.lock().unwrap();
    assert_eq!(failures.len(), 5);
    assert_eq!(failures[0].1, 4);
    assert_eq!(failures[4].1, 0);
    assert_eq!(*observer.finished.lock().unwrap(), Some((5, false)));
}

#[tokio::test]
async fn test_recovers_after_failure() {
    let root = tempdir().unwrap();
    let runner = MockRunner::new().with_responses(vec![
        MockResponse::success("initialized"),
        MockResponse::failure(1, "Error: Missing required argument"),
        MockResponse::success("initialized"),
        MockResponse::success("Success! The configuration is valid."),
    ]);
    let llm = scripted_llm(2);
    let workflow = ModuleWorkflow::new(Arc::new(llm.clone()), validator(&runner))
        .with_output_root(root.path());

    let report = workflow.run(&request(), &SilentObserver).await.unwrap();

    assert!(report.validated);
    assert_eq!(report.attempts, 2);
    assert_eq!(llm.request_count(), 6);
    assert!(llm.requests()[1]
        .user
        .contains("Error: Missing required argument"));
}

#[tokio::test]
async fn test_observer_error_aborts_run() {
    struct Abort;
    impl AttemptObserver for Abort {
        fn on_validation_failed(&self, _failure: &AttemptFailure<'_>) -> CoreResult<()> {
            Err(modgen_core::CoreError::Interaction("stdin closed".to_string()))
        }
    }

    let root = tempdir().unwrap();
    let runner = always_invalid();
    let llm = scripted_llm(5);
    let workflow = ModuleWorkflow::new(Arc::new(llm.clone()), validator(&runner))
        .with_output_root(root.path());

    let result = workflow.run(&request(), &Abort).await;

    assert!(result.is_err());
    assert_eq!(llm.request_count(), 1);
}

#[tokio::test]
async fn test_formatter_runs_on_output_dir() {
    let root = tempdir().unwrap();
    let runner = MockRunner::new();
    let llm = scripted_llm(1);
    let terraform = Arc::new(TerraformRunner::new(Arc::new(runner.clone())));
    let workflow = ModuleWorkflow::new(Arc::new(llm), validator(&runner))
        .with_output_root(root.path())
        .with_formatter(terraform);

    let report = workflow.run(&request(), &SilentObserver).await.unwrap();

    let fmt_calls = runner.calls_for("fmt");
    assert_eq!(fmt_calls.len(), 1);
    assert_eq!(fmt_calls[0].workdir, report.output_dir);
}

#[tokio::test]
async fn test_llm_failure_propagates() {
    let root = tempdir().unwrap();
    let runner = MockRunner::new();
    let workflow = ModuleWorkflow::new(Arc::new(MockCompletionClient::new()), validator(&runner))
        .with_output_root(root.path());

    let result = workflow.run(&request(), &SilentObserver).await;

    assert!(matches!(result, Err(modgen_core::CoreError::Llm(_))));
    assert_eq!(runner.call_count(), 0);
}
