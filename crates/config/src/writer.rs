//! Credential persistence writer.
//!
//! Responsibilities:
//! - Write the persistent subset of a `Config` to its config file section.
//! - Write issued credentials to the credentials file.
//! - Write a valid SAML assertion to the per-IdP cache file.
//!
//! Does NOT handle:
//! - Creating the files (see `ProfileStore::ensure_files_exist`, run by the loader).
//! - Choosing values; it writes what the snapshot holds.
//!
//! Invariants:
//! - Each phase holds its own file lock for its whole read-modify-write cycle.
//! - A failing phase is reported and logged; later phases still run.
//! - Password, account, assertion override, log level, and the one-shot
//!   flags (`quiet`, `print_creds`, `use_cache`, ...) never reach the config file.
//! - An absent value removes the key rather than writing an empty one.

use std::path::PathBuf;

use secrecy::ExposeSecret;
use thiserror::Error;

use crate::cache;
use crate::constants::{
    EXPIRATION_FORMAT, KEY_ACCESS_KEY_ID, KEY_ASK_ROLE, KEY_BG_RESPONSE, KEY_DURATION, KEY_IDP_ID,
    KEY_KEYRING, KEY_REGION, KEY_ROLE_ARN, KEY_SECRET_ACCESS_KEY, KEY_SECURITY_TOKEN,
    KEY_SESSION_EXPIRATION, KEY_SESSION_TOKEN, KEY_SP_ID, KEY_U2F_DISABLED, KEY_USERNAME,
};
use crate::persistence::{ConfigFileError, FileLock, ProfileDocument, ProfileStore, config_profile};
use crate::types::{Config, IssuedCredentials};
use crate::validation::{ValidationError, check_role_arn};

/// Errors from one persistence phase.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Refusing to write config: {0}")]
    InvalidRoleArn(ValidationError),

    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    File(#[from] ConfigFileError),

    #[error("Failed to write SAML cache {path}: {source}")]
    Cache {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Outcome of each phase of `commit`.
#[derive(Debug)]
pub struct CommitReport {
    pub config: Result<(), PersistError>,
    /// `None` when no credentials were supplied.
    pub credentials: Option<Result<(), PersistError>>,
    /// `None` when there was no valid assertion to cache.
    pub cache: Option<Result<(), PersistError>>,
}

impl CommitReport {
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Errors from the phases that ran, in phase order.
    pub fn errors(&self) -> impl Iterator<Item = &PersistError> {
        std::iter::once(&self.config)
            .chain(self.credentials.as_ref())
            .chain(self.cache.as_ref())
            .filter_map(|result| result.as_ref().err())
    }
}

fn flag(value: bool) -> Option<&'static str> {
    Some(if value { "true" } else { "false" })
}

fn lock(path: &std::path::Path) -> Result<FileLock, PersistError> {
    FileLock::acquire(path).map_err(|source| PersistError::Lock {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the persistent fields of `config` to its config file section.
pub fn write_config(config: &Config, store: &ProfileStore) -> Result<(), PersistError> {
    if let Some(arn) = config.role_arn.as_deref() {
        check_role_arn(arn).map_err(PersistError::InvalidRoleArn)?;
    }

    let _lock = lock(store.config_file())?;
    let mut doc = ProfileDocument::load(store.config_file())?;
    let section = config_profile(&config.profile);
    let duration = config.duration.to_string();

    doc.set(&section, KEY_USERNAME, config.username.as_deref());
    doc.set(&section, KEY_IDP_ID, config.idp_id.as_deref());
    doc.set(&section, KEY_SP_ID, config.sp_id.as_deref());
    doc.set(&section, KEY_REGION, config.region.as_deref());
    doc.set(&section, KEY_DURATION, Some(duration.as_str()));
    doc.set(&section, KEY_BG_RESPONSE, config.bg_response.as_deref());
    doc.set(&section, KEY_ROLE_ARN, config.role_arn.as_deref());
    doc.set(&section, KEY_ASK_ROLE, flag(config.ask_role));
    doc.set(&section, KEY_KEYRING, flag(config.keyring));
    doc.set(&section, KEY_U2F_DISABLED, flag(config.disable_second_factor));
    doc.save()?;

    tracing::info!(section = %section, path = %store.config_file().display(), "config written");
    Ok(())
}

/// Write `credentials` to the section named after the profile, verbatim.
pub fn write_credentials(
    profile: &str,
    credentials: &IssuedCredentials,
    store: &ProfileStore,
) -> Result<(), PersistError> {
    let _lock = lock(store.credentials_file())?;
    let mut doc = ProfileDocument::load(store.credentials_file())?;
    let expiration = credentials.expiration.format(EXPIRATION_FORMAT).to_string();
    let session_token = credentials.session_token.expose_secret();

    doc.set(profile, KEY_ACCESS_KEY_ID, Some(credentials.access_key_id.as_str()));
    doc.set(
        profile,
        KEY_SECRET_ACCESS_KEY,
        Some(credentials.secret_access_key.expose_secret()),
    );
    doc.set(profile, KEY_SECURITY_TOKEN, Some(session_token));
    doc.set(profile, KEY_SESSION_TOKEN, Some(session_token));
    doc.set(profile, KEY_SESSION_EXPIRATION, Some(expiration.as_str()));
    doc.save()?;

    tracing::info!(
        profile = %profile,
        expiration = %expiration,
        path = %store.credentials_file().display(),
        "credentials written"
    );
    Ok(())
}

/// Persist everything the snapshot carries.
///
/// Runs the config, credentials, and cache phases in that order. Each phase
/// records its own result; a failure never skips the phases after it.
pub fn commit(
    config: &Config,
    store: &ProfileStore,
    credentials: Option<&IssuedCredentials>,
) -> CommitReport {
    let config_result = write_config(config, store);
    if let Err(e) = &config_result {
        tracing::error!(profile = %config.profile, error = %e, "failed to write config");
    }

    let credentials_result = credentials.map(|creds| {
        let result = write_credentials(&config.profile, creds, store);
        if let Err(e) = &result {
            tracing::error!(profile = %config.profile, error = %e, "failed to write credentials");
        }
        result
    });

    let cache_result = match (config.saml_cache(), config.idp_id.as_deref()) {
        (Some(assertion), Some(idp_id)) => {
            let result = cache::write(store, idp_id, assertion).map_err(|source| {
                PersistError::Cache {
                    path: store.saml_cache_file(idp_id),
                    source,
                }
            });
            if let Err(e) = &result {
                tracing::error!(idp_id = %idp_id, error = %e, "failed to write SAML cache");
            }
            Some(result)
        }
        _ => None,
    };

    CommitReport {
        config: config_result,
        credentials: credentials_result,
        cache: cache_result,
    }
}
