//! Path helpers for the shared AWS config and credentials files.
//!
//! Responsibilities:
//! - Determine the config and credentials file locations the AWS CLI uses.
//! - Use the `directories` crate for the platform home directory.
//!
//! Does NOT handle:
//! - File I/O operations.
//! - Locking.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::loader::env_var_or_none;

fn home_dir() -> Result<PathBuf, anyhow::Error> {
    let dirs = directories::BaseDirs::new().context("Failed to determine home directory")?;
    Ok(dirs.home_dir().to_path_buf())
}

/// Expand a leading `~/` the way the AWS CLI does for its path variables.
pub(crate) fn expand_home(path: &str) -> Result<PathBuf, anyhow::Error> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None if path == "~" => home_dir(),
        None => Ok(Path::new(path).to_path_buf()),
    }
}

/// `AWS_CONFIG_FILE`, or `~/.aws/config`.
pub(crate) fn default_config_file() -> Result<PathBuf, anyhow::Error> {
    match env_var_or_none("AWS_CONFIG_FILE") {
        Some(path) => expand_home(&path),
        None => Ok(home_dir()?.join(".aws").join("config")),
    }
}

/// `AWS_SHARED_CREDENTIALS_FILE`, or `~/.aws/credentials`.
pub(crate) fn default_credentials_file() -> Result<PathBuf, anyhow::Error> {
    match env_var_or_none("AWS_SHARED_CREDENTIALS_FILE") {
        Some(path) => expand_home(&path),
        None => Ok(home_dir()?.join(".aws").join("credentials")),
    }
}
