//! Interactive resolution of missing configuration.
//!
//! Responsibilities:
//! - Define the `Prompter` seam between the library and a terminal.
//! - Prompt for required fields that are absent after the merge, re-validating
//!   each answer until it passes or the user aborts.
//!
//! Does NOT handle:
//! - Rendering prompts (the CLI implements `Prompter` with `dialoguer`).
//! - Deciding which fields are required (callers pass the list).
//!
//! Invariants:
//! - Password-class fields are always requested through `Prompter::secret`.
//! - An aborted prompt leaves the snapshot unchanged for that field.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::types::Config;
use crate::validation::{Field, check_field, missing};

/// Errors from a prompt.
#[derive(Error, Debug)]
pub enum PromptError {
    /// The user interrupted input (Ctrl+C, EOF).
    #[error("input aborted by user")]
    Aborted,

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of interactive answers.
pub trait Prompter {
    /// Ask for a plain-text value.
    fn input(&mut self, field: Field, prompt: &str) -> Result<String, PromptError>;

    /// Ask for a masked value.
    fn secret(&mut self, field: Field, prompt: &str) -> Result<SecretString, PromptError>;

    /// Pick one of `items`; returns a 0-based index.
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, PromptError>;
}

/// Prompt until `field` holds a valid value, then store it on `config`.
pub fn prompt_field(
    config: &mut Config,
    field: Field,
    prompter: &mut dyn Prompter,
) -> Result<(), PromptError> {
    loop {
        if field.is_secret() {
            let answer = prompter.secret(field, field.prompt())?;
            match check_field(field, answer.expose_secret()) {
                Ok(()) => {
                    config.password = Some(answer);
                    return Ok(());
                }
                Err(e) => tracing::warn!(field = %field, error = %e, "invalid input, try again"),
            }
        } else {
            let answer = prompter.input(field, field.prompt())?;
            match check_field(field, &answer) {
                Ok(()) => {
                    assign(config, field, answer.trim().to_string());
                    tracing::debug!(field = %field, "value provided interactively");
                    return Ok(());
                }
                Err(e) => tracing::warn!(field = %field, error = %e, "invalid input, try again"),
            }
        }
    }
}

/// Prompt for every field in `required` that is currently absent or blank.
pub fn fill_missing(
    config: &mut Config,
    required: &[Field],
    prompter: &mut dyn Prompter,
) -> Result<(), PromptError> {
    for field in missing(config, required) {
        prompt_field(config, field, prompter)?;
    }
    Ok(())
}

fn assign(config: &mut Config, field: Field, value: String) {
    match field {
        Field::Profile => config.profile = value,
        Field::Username => config.username = Some(value),
        Field::IdpId => config.idp_id = Some(value),
        Field::SpId => config.sp_id = Some(value),
        Field::Region => config.region = Some(value),
        Field::Account => config.account = Some(value),
        Field::RoleArn => config.role_arn = Some(value),
        Field::Duration => {
            // check_field already proved this parses.
            if let Ok(duration) = value.parse() {
                config.duration = duration;
            }
        }
        Field::Password => config.password = Some(SecretString::new(value.into())),
    }
}
