//! Terminal prompts backed by dialoguer.
//!
//! Responsibilities:
//! - Implement `Prompter` for an interactive terminal.
//! - Map an interrupted or closed terminal to `PromptError::Aborted`.
//!
//! Does NOT handle:
//! - Deciding which fields to ask for (see `gauth_config::interactive`).

use std::io::ErrorKind;

use dialoguer::{Input, Password, Select};
use gauth_config::{Field, PromptError, Prompter};
use secrecy::SecretString;

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

fn map_err(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(e)
            if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::UnexpectedEof) =>
        {
            PromptError::Aborted
        }
        dialoguer::Error::IO(e) => PromptError::Io(e),
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, _field: Field, prompt: &str) -> Result<String, PromptError> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(map_err)
    }

    fn secret(&mut self, _field: Field, prompt: &str) -> Result<SecretString, PromptError> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map(|password| SecretString::new(password.into()))
            .map_err(map_err)
    }

    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(map_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_maps_to_aborted() {
        let err = dialoguer::Error::IO(std::io::Error::from(ErrorKind::Interrupted));
        assert!(matches!(map_err(err), PromptError::Aborted));
    }

    #[test]
    fn test_other_io_errors_are_kept() {
        let err = dialoguer::Error::IO(std::io::Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(map_err(err), PromptError::Io(_)));
    }
}
