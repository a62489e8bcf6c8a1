//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Input};

use crate::error::CliError;

/// Whether stdin is attached to a terminal we can prompt on.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| prompt_err("confirmation", e))
}

/// Prompt for a required line of text.
pub fn prompt_text(field: &str, prompt: &str) -> Result<String, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| prompt_err(field, e))?;
    Ok(value.trim().to_owned())
}

/// Prompt for a secret without echoing it.
pub fn prompt_secret(field: &str, prompt: &str) -> Result<String, CliError> {
    rpassword::prompt_password(format!("{prompt}: ")).map_err(|e| prompt_err(field, e))
}

fn prompt_err(field: &str, e: impl std::fmt::Display) -> CliError {
    CliError::Prompt {
        field: field.into(),
        reason: e.to_string(),
    }
}
