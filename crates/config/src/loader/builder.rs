//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` that collects the four layers.
//! - Resolve the profile name before the config file section is read.
//! - Build and validate the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Config file section parsing (delegated to profile.rs).
//! - Persisting configuration changes (see `writer`).
//!
//! Invariants / Assumptions:
//! - Layers may be collected in any order; `build()` always merges
//!   CLI > environment > config file > default.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use super::defaults::Defaults;
use super::env::read_env;
use super::error::ConfigError;
use super::layer::ConfigLayer;
use super::profile::from_profile_section;
use super::resolve::resolve;
use crate::persistence::{ProfileDocument, ProfileStore};
use crate::types::Config;
use crate::validation::validate;

/// Collects configuration layers and builds a validated `Config`.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    defaults: Defaults,
    store: Option<ProfileStore>,
    read_profile: bool,
    env: ConfigLayer,
    cli: ConfigLayer,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Select the profile explicitly, with the same precedence as `--profile`.
    pub fn with_profile_name(mut self, name: impl Into<String>) -> Self {
        self.cli.profile = Some(name.into());
        self
    }

    /// Use explicit file locations instead of discovering them.
    pub fn with_store(mut self, store: ProfileStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Read the selected profile's section from the config file at build time.
    ///
    /// Discovers the store now if none was given, so a missing home directory
    /// fails early.
    pub fn from_profile(mut self) -> Result<Self, ConfigError> {
        if self.store.is_none() {
            let store = ProfileStore::discover()
                .map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?;
            self.store = Some(store);
        }
        self.read_profile = true;
        Ok(self)
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        self.env = read_env()?;
        Ok(self)
    }

    /// Set the command-line layer. A profile set earlier through
    /// `with_profile_name` is kept unless the layer names its own.
    pub fn with_cli(mut self, mut layer: ConfigLayer) -> Self {
        if layer.profile.is_none() {
            layer.profile = self.cli.profile.take();
        }
        self.cli = layer;
        self
    }

    /// The profile the file layer will be read from.
    pub fn profile_name(&self) -> &str {
        self.cli
            .profile
            .as_deref()
            .or(self.env.profile.as_deref())
            .unwrap_or(&self.defaults.profile)
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let file = match (&self.store, self.read_profile) {
            (Some(store), true) => {
                store.ensure_files_exist()?;
                let doc = ProfileDocument::load(store.config_file())?;
                from_profile_section(&doc, self.profile_name())?
            }
            _ => ConfigLayer::default(),
        };

        let config = resolve(&self.defaults, file, self.env, self.cli)?;
        validate(&config)?;
        Ok(config)
    }
}
