//! Configuration type definitions for aws-google-auth.
//!
//! Responsibilities:
//! - Define the resolved configuration snapshot (`Config`) and its duration bounds.
//! - Define the credentials issued by the broker (`IssuedCredentials`).
//! - Provide keyring access for the IdP password.
//!
//! Does NOT handle:
//! - Configuration loading from files or environment variables (see `loader` module).
//! - Writing configuration back to disk (see `writer` module).
//! - Actual SAML login or STS calls (external collaborators, see `auth` module).
//!
//! Invariants:
//! - All secret types use `secrecy::SecretString` to prevent accidental logging.
//! - `KEYRING_SERVICE` is the canonical service name for all keyring operations.

mod auth;
mod config;
mod credentials;

pub use auth::{PasswordVault, SystemKeyring, store_password, stored_password};
pub use config::{Config, DurationBounds, LogLevel};
pub use credentials::IssuedCredentials;
