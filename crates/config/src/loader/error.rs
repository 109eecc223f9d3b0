//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for every resolution failure.
//! - Carry the variable, key, or path that caused the failure.
//!
//! Does NOT handle:
//! - Errors from writing files back (see `writer::PersistError`).
//!
//! Invariants:
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.
//! - Values from `SAML_ASSERTION` or `GOOGLE_BG_RESPONSE` never appear in messages.

use std::io::ErrorKind;

use thiserror::Error;

use crate::persistence::ConfigFileError;
use crate::validation::{BoundsError, ValidationError};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidEnvironmentValue { var: String, message: String },

    #[error("Invalid value for '{key}' in config file: {message}")]
    InvalidFileValue { key: String, message: String },

    #[error("--{first} and --{second} cannot be used together")]
    Conflict {
        first: &'static str,
        second: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid duration bounds: {0}")]
    Bounds(#[from] BoundsError),

    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    #[error("Unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
