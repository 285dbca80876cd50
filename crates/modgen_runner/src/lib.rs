//! # modgen_runner
//!
//! Process execution wrapper for modgen.
//!
//! Every external tool modgen drives (the `terraform` CLI in practice) goes
//! through the [`CommandRunner`] trait, so the same command can run against a
//! locally installed binary or inside a container image.
//!
//! # Features
//!
//! - **Local Runner**: spawns the binary directly in the working directory
//! - **Container Runner**: wraps the command in `docker run` / `podman run`
//!   with the working directory bind-mounted
//! - **Runtime Detection**: auto-detect Docker vs Podman
//! - **Mock Runner**: scripted responses for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use modgen_runner::{CommandConfig, CommandRunner, LocalRunner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = LocalRunner::new();
//!     let config = CommandConfig::new("terraform")
//!         .arg("version")
//!         .workdir(".");
//!
//!     let result = runner.run(&config).await?;
//!     println!("Exit code: {}", result.exit_code);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod local;
pub mod mock;
pub mod runner;

pub use config::CommandConfig;
pub use container::{ContainerCliRunner, ContainerRuntime};
pub use error::{RunnerError, RunnerResult};
pub use local::LocalRunner;
pub use mock::{CapturedCall, MockResponse, MockRunner};
pub use runner::{CommandRunner, ExecutionResult};
