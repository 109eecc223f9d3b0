//! Configuration core for aws-google-auth.
//!
//! This crate resolves, validates, and persists the settings needed to trade a
//! Google SAML assertion for temporary AWS credentials. It also owns the SAML
//! assertion cache and role selection, and drives the whole run over the
//! `AssertionProvider` and `CredentialBroker` seams.

pub mod auth;
pub mod cache;
pub mod constants;
pub mod interactive;
mod loader;
pub mod persistence;
pub mod roles;
pub mod types;
pub mod validation;
pub mod writer;

pub use auth::{
    AssertionProvider, AuthError, BrokerError, Collaborators, CredentialBroker, LoginRequest,
    ProviderError, Session, authenticate,
};
pub use cache::SamlAssertion;
pub use interactive::{PromptError, Prompter};
pub use loader::{
    ConfigError, ConfigLayer, ConfigLoader, Defaults, ENV_LOG_LEVEL, env_var_or_none, from_profile_section,
    read_env, resolve,
};
pub use persistence::ProfileStore;
pub use roles::{AliasMap, Role, RoleError};
pub use types::{
    Config, DurationBounds, IssuedCredentials, LogLevel, PasswordVault, SystemKeyring,
};
pub use validation::{BoundsError, Field, ValidationError};
pub use writer::{CommitReport, PersistError, commit};

#[cfg(test)]
pub(crate) mod test_util {
    use std::collections::VecDeque;

    use secrecy::SecretString;

    use crate::interactive::{PromptError, Prompter};
    use crate::validation::Field;

    /// Answers prompts from a fixed script; runs out as `PromptError::Aborted`.
    ///
    /// `select` answers are 1-based, as a user would type them.
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        asked: Vec<Field>,
        secret_prompts: usize,
        selections: usize,
    }

    impl ScriptedPrompter {
        pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
            Self {
                answers: answers.into_iter().map(str::to_string).collect(),
                asked: Vec::new(),
                secret_prompts: 0,
                selections: 0,
            }
        }

        pub fn asked(&self) -> &[Field] {
            &self.asked
        }

        pub fn secret_prompts(&self) -> usize {
            self.secret_prompts
        }

        pub fn selections(&self) -> usize {
            self.selections
        }

        fn next(&mut self) -> Result<String, PromptError> {
            self.answers.pop_front().ok_or(PromptError::Aborted)
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&mut self, field: Field, _prompt: &str) -> Result<String, PromptError> {
            self.asked.push(field);
            self.next()
        }

        fn secret(&mut self, field: Field, _prompt: &str) -> Result<SecretString, PromptError> {
            self.asked.push(field);
            self.secret_prompts += 1;
            self.next().map(|answer| SecretString::new(answer.into()))
        }

        fn select(&mut self, _prompt: &str, items: &[String]) -> Result<usize, PromptError> {
            self.selections += 1;
            let answer = self.next()?;
            answer
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .filter(|i| *i < items.len())
                .ok_or(PromptError::Aborted)
        }
    }
}
