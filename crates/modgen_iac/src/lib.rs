//! # modgen_iac
//!
//! Terraform orchestration for modgen.
//!
//! This crate drives the `terraform` CLI through a
//! [`modgen_runner::CommandRunner`] and turns its results into a
//! [`ValidationReport`] the generator can feed back to the model.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use modgen_iac::{ModuleValidator, TerraformRunner, TerraformValidator};
//! use modgen_runner::LocalRunner;
//!
//! # async fn demo() -> modgen_iac::IacResult<()> {
//! let terraform = TerraformRunner::new(Arc::new(LocalRunner::new()));
//! let validator = TerraformValidator::new(terraform);
//!
//! let report = validator.validate(Path::new("./generated_module/temp")).await?;
//! if !report.passed {
//!     println!("{}", report.error_text().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod terraform;
pub mod validator;

pub use error::{IacError, IacResult};
pub use terraform::{TerraformResult, TerraformRunner};
pub use validator::{ModuleValidator, TerraformValidator, ValidationCheck, ValidationReport};
