//! Configuration loader for environment variables and the AWS config file.
//!
//! Responsibilities:
//! - Load configuration from `.env` files, environment variables, the config
//!   file's profile section, and a caller-supplied CLI layer.
//! - Provide a builder-pattern `ConfigLoader` over the pure `resolve` merge.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Persisting configuration changes back to disk (see `writer`).
//! - Prompting for values that remain missing (see `interactive`).
//!
//! Invariants / Assumptions:
//! - CLI > environment > config file > default, field by field.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod defaults;
mod env;
mod error;
mod layer;
mod profile;
mod resolve;

pub use builder::ConfigLoader;
pub use defaults::Defaults;
pub use env::{ENV_LOG_LEVEL, env_var_or_none, read_env};
pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use profile::from_profile_section;
pub use resolve::resolve;

#[cfg(test)]
mod tests;
