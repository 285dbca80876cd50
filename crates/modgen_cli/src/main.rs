//! modgen CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 3: Validation failure
//! - 5: IaC error
//! - 6: LLM credential missing

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod interaction;

use commands::{Cli, Commands};
use modgen_core::CoreError;
use modgen_iac::IacError;
use modgen_llm::LlmError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const IAC_ERROR: u8 = 5;
    pub const CREDENTIALS_MISSING: u8 = 6;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Generate(args) => {
            commands::generate::execute(args, cli.config.as_deref()).await
        }
        Commands::Validate(args) => {
            commands::validate::execute(args, cli.config.as_deref()).await
        }
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "modgen=debug,warn"
    } else if quiet {
        "error"
    } else {
        "modgen=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Map an error chain to an exit code.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.is::<commands::validate::ValidationFailed>() {
            return ExitCodes::VALIDATION_FAILURE;
        }
        if let Some(err) = cause.downcast_ref::<LlmError>() {
            if matches!(err, LlmError::NotConfigured | LlmError::MissingKey(_)) {
                return ExitCodes::CREDENTIALS_MISSING;
            }
        }
        if let Some(err) = cause.downcast_ref::<CoreError>() {
            match err {
                CoreError::InvalidRequest(_)
                | CoreError::InvalidConfig(_)
                | CoreError::ConfigParse { .. } => return ExitCodes::INVALID_ARGS,
                CoreError::Iac(_) | CoreError::Runner(_) => return ExitCodes::IAC_ERROR,
                CoreError::Llm(LlmError::NotConfigured | LlmError::MissingKey(_)) => {
                    return ExitCodes::CREDENTIALS_MISSING
                }
                _ => {}
            }
        }
        if cause.is::<IacError>() || cause.is::<modgen_runner::RunnerError>() {
            return ExitCodes::IAC_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}
