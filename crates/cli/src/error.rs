//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ConfigError` and `AuthError` variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).
//! - Clap usage errors keep clap's own exit code (2).

use gauth_config::persistence::ConfigFileError;
use gauth_config::{AuthError, BrokerError, ConfigError, PromptError, ProviderError, RoleError};

use crate::cancellation::SIGINT_EXIT_CODE;

/// Structured exit codes for aws-google-auth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,

    /// Unhandled or generic failure, including failed file writes.
    GeneralError = 1,

    /// The login was rejected or the role could not be assumed.
    ///
    /// Scripts should check the password or the role mapping.
    AuthenticationFailed = 2,

    /// Bad input: a missing or malformed setting.
    ///
    /// Scripts should fix the input and not retry the same invocation.
    ValidationError = 5,

    /// Ctrl+C or an aborted prompt.
    Interrupted = SIGINT_EXIT_CODE,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::InvalidEnvironmentValue { .. }
            | ConfigError::InvalidFileValue { .. }
            | ConfigError::Conflict { .. }
            | ConfigError::Validation(_)
            | ConfigError::Bounds(_) => ExitCode::ValidationError,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<&AuthError> for ExitCode {
    fn from(err: &AuthError) -> Self {
        match err {
            _ if err.is_aborted() => ExitCode::Interrupted,
            AuthError::Validation(_) | AuthError::InvalidAssertion(_) => ExitCode::ValidationError,
            AuthError::Provider(ProviderError::Rejected(_))
            | AuthError::TooManyAttempts { .. }
            | AuthError::Broker(BrokerError::Denied(_)) => ExitCode::AuthenticationFailed,
            AuthError::Role(_) => ExitCode::ValidationError,
            _ => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns `ExitCode::GeneralError` unless a known error sits in the chain.
    fn exit_code(&self) -> ExitCode;

    /// True when the chain holds an error the user can act on from its message alone.
    fn is_expected(&self) -> bool;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<AuthError>() {
                return ExitCode::from(err);
            }
        }
        ExitCode::GeneralError
    }

    fn is_expected(&self) -> bool {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<ConfigError>() {
                return !is_internal_config_error(err);
            }
            if let Some(err) = cause.downcast_ref::<AuthError>() {
                return !is_internal_auth_error(err);
            }
        }
        false
    }
}

/// Filesystem and environment failures; a malformed file stays user-facing.
fn is_internal_config_error(err: &ConfigError) -> bool {
    matches!(
        err,
        ConfigError::Io(_)
            | ConfigError::ConfigDirUnavailable(_)
            | ConfigError::DotenvIo { .. }
            | ConfigError::ConfigFile(ConfigFileError::Read { .. } | ConfigFileError::Write { .. })
    )
}

fn is_internal_auth_error(err: &AuthError) -> bool {
    matches!(
        err,
        AuthError::Provider(ProviderError::Internal(_))
            | AuthError::Broker(BrokerError::Internal(_))
            | AuthError::Prompt(PromptError::Io(_))
            | AuthError::Role(RoleError::Prompt(PromptError::Io(_)))
    )
}
