//! Terminal interaction for the generate command.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use dialoguer::Input;
use tracing::debug;

use modgen_core::{AttemptFailure, AttemptObserver, CoreError, CoreResult, GenerationOutcome};

/// Ask for a required line of text.
///
/// Without a terminal on stdin the answer has to come from a flag instead.
pub fn ask(prompt: &str) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return Err(CoreError::InvalidRequest(format!(
            "'{}' needs an interactive terminal; pass --provider and --description instead",
            prompt
        ))
        .into());
    }

    let answer: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("A value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .context("Failed to get user input")?;
    Ok(answer.trim().to_string())
}

/// Reports attempt progress on stdout and optionally waits for Enter after
/// a failed attempt.
///
/// The pause is skipped when stdin is not a terminal (CI, piped input).
pub struct ConsoleObserver {
    pause: bool,
    interactive: bool,
}

impl ConsoleObserver {
    pub fn new(pause: bool) -> Self {
        Self {
            pause,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    fn should_pause(&self, failure: &AttemptFailure<'_>) -> bool {
        self.pause && self.interactive && failure.attempts_remaining() > 0
    }
}

impl AttemptObserver for ConsoleObserver {
    fn on_attempt_started(&self, attempt: u32, max_attempts: u32) {
        println!("⏳ Generating module (attempt {}/{})...", attempt, max_attempts);
    }

    fn on_validation_failed(&self, failure: &AttemptFailure<'_>) -> CoreResult<()> {
        println!(
            "\n❌ Validation of attempt #{} failed:\n{}",
            failure.attempt,
            failure.error_text.trim_end()
        );
        println!(
            "You can review the generated module at: {}",
            failure.draft_dir.display()
        );

        if self.pause && !self.interactive {
            debug!("stdin is not a terminal, continuing without pausing");
        }
        if self.should_pause(failure) {
            let _: String = Input::new()
                .with_prompt("Press Enter to continue to the next attempt...")
                .allow_empty(true)
                .interact_text()
                .map_err(|e| CoreError::Interaction(e.to_string()))?;
        }
        Ok(())
    }

    fn on_generation_finished(&self, outcome: &GenerationOutcome) {
        if outcome.validated {
            println!("✅ Terraform module validated. Writing files...");
        } else {
            println!(
                "⚠️  Failed to generate a valid Terraform module after multiple attempts. \
                 Writing module files that will require manual review and correction."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn failure(attempt: u32) -> AttemptFailure<'static> {
        AttemptFailure {
            attempt,
            max_attempts: 5,
            error_text: "Error: Unsupported argument",
            draft_dir: Path::new("temp"),
        }
    }

    fn terminal_observer(pause: bool) -> ConsoleObserver {
        ConsoleObserver {
            pause,
            interactive: true,
        }
    }

    #[test]
    fn test_pauses_only_with_attempts_left() {
        let observer = terminal_observer(true);
        assert!(observer.should_pause(&failure(1)));
        assert!(observer.should_pause(&failure(4)));
        assert!(!observer.should_pause(&failure(5)));
    }

    #[test]
    fn test_no_pause_never_prompts() {
        let observer = terminal_observer(false);
        assert!(!observer.should_pause(&failure(1)));
        // Would block on stdin if it prompted
        assert!(observer.on_validation_failed(&failure(1)).is_ok());
    }

    #[test]
    fn test_without_terminal_failures_are_tolerated() {
        let observer = ConsoleObserver {
            pause: true,
            interactive: false,
        };

        assert!(!observer.should_pause(&failure(1)));
        for attempt in 1..=5 {
            assert!(observer.on_validation_failed(&failure(attempt)).is_ok());
        }
    }
}
