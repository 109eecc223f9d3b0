//! Persistent store accessor for profile-scoped files.
//!
//! Responsibilities:
//! - Locate the AWS config file, the credentials file, and the per-IdP SAML cache.
//! - Create missing files as empty placeholders with owner-only permissions.
//! - Provide advisory locking and INI read/modify/write helpers.
//!
//! Does NOT handle:
//! - Deciding which fields are persisted (see `writer` module).
//! - Interpreting config values (see `loader` module).
//!
//! Invariants:
//! - Directories are created with mode `0700`, files with `0600` (unix).
//! - The SAML cache always lives in the credentials file's directory.
//! - Config sections are `profile <name>` except for `default`.

use std::path::{Path, PathBuf};

use thiserror::Error;

mod document;
mod lock;
mod path;

pub use document::ProfileDocument;
pub use lock::{FileLock, lock_path};

pub(crate) use document::open_private;

/// Errors reading or writing one of the profile files.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Section header used in the config file for `profile`.
///
/// `"default"` is written verbatim; every other profile becomes `"profile <name>"`.
pub fn config_profile(profile: &str) -> String {
    if profile.eq_ignore_ascii_case("default") {
        profile.to_string()
    } else {
        format!("profile {profile}")
    }
}

/// Locations of the files this tool reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    config_file: PathBuf,
    credentials_file: PathBuf,
}

impl ProfileStore {
    /// Use the same files as the AWS CLI (`AWS_CONFIG_FILE`,
    /// `AWS_SHARED_CREDENTIALS_FILE`, or `~/.aws/`).
    pub fn discover() -> Result<Self, anyhow::Error> {
        Ok(Self {
            config_file: path::default_config_file()?,
            credentials_file: path::default_credentials_file()?,
        })
    }

    /// Use explicit file locations (primarily for testing).
    pub fn new(config_file: PathBuf, credentials_file: PathBuf) -> Self {
        Self {
            config_file,
            credentials_file,
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn credentials_file(&self) -> &Path {
        &self.credentials_file
    }

    /// Cache file for `idp_id`: the credentials path with `credentials`
    /// replaced by `saml_cache_<idp_id>.xml`.
    pub fn saml_cache_file(&self, idp_id: &str) -> PathBuf {
        let credentials = self.credentials_file.to_string_lossy();
        PathBuf::from(credentials.replace("credentials", &format!("saml_cache_{idp_id}.xml")))
    }

    /// Create the config and credentials files (and their directories) if absent.
    pub fn ensure_files_exist(&self) -> std::io::Result<()> {
        for file in [&self.config_file, &self.credentials_file] {
            if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                create_private_dir(parent)?;
            }
            if !file.exists() {
                touch_private(file)?;
                tracing::info!(path = %file.display(), "created empty profile file");
            }
        }
        Ok(())
    }
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        return Ok(());
    }
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

fn touch_private(file: &Path) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(file).map(|_| ())
}
