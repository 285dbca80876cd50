//! Error types for IaC module.

use thiserror::Error;

/// Result type alias for IaC operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur during IaC operations.
///
/// A failing `terraform validate` is not an error; it is reported through
/// [`crate::ValidationReport`]. These variants cover the cases where the
/// command could not be run at all.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("Terraform not available: {0}")]
    TerraformNotAvailable(String),

    #[error("Module directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Runner error: {0}")]
    Runner(#[from] modgen_runner::RunnerError),
}
