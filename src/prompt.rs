//! Operator confirmation.

use crate::error::{Result, SyncError};
use std::io::IsTerminal;

/// Asks the operator a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Answers yes without asking. Used for `--yes` and non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        log::debug!("assuming yes: {}", prompt);
        Ok(true)
    }
}

/// Interactive prompt on the terminal.
#[derive(Debug, Clone, Copy)]
pub struct DialoguerConfirm {
    default: bool,
}

impl DialoguerConfirm {
    pub fn new(default: bool) -> Self {
        Self { default }
    }
}

impl Confirm for DialoguerConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(self.default)
            .interact()
            .map_err(|e| SyncError::UserError(format!("failed to read confirmation: {}", e)))
    }
}

/// Pick the confirmation strategy for this run.
///
/// Non-interactive runs (`--yes`, or stdin is not a terminal) answer yes.
/// Interactive runs prompt with "no" as the default answer, so the default
/// is always `!interactive`.
pub fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    let interactive = !assume_yes && std::io::stdin().is_terminal();
    if interactive {
        Box::new(DialoguerConfirm::new(false))
    } else {
        Box::new(AssumeYes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assume_yes_confirms() {
        assert!(AssumeYes.confirm("Proceed?").unwrap());
    }

    #[test]
    fn test_assume_yes_flag_never_prompts() {
        let mut confirm = confirmer(true);
        assert!(confirm.confirm("Proceed?").unwrap());
    }
}
