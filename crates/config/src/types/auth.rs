//! Keyring storage for the IdP password.
//!
//! Responsibilities:
//! - Look up a previously stored password for a username.
//! - Store a password after a successful login.
//! - Expose both through the `PasswordVault` seam.
//!
//! Does NOT handle:
//! - Deciding whether the keyring is enabled (see `Config::keyring`).
//! - Prompting for the password (see `interactive` module).
//!
//! Invariants:
//! - Entries live under `KEYRING_SERVICE` with the username as the account.
//! - A missing entry is `Ok(None)`, never an error.

use secrecy::{ExposeSecret, SecretString};

use crate::constants::KEYRING_SERVICE;

/// Fetch the password stored for `username`, if any.
pub fn stored_password(username: &str) -> Result<Option<SecretString>, keyring::Error> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)?;
    match entry.get_password() {
        Ok(password) => Ok(Some(SecretString::new(password.into()))),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Store `password` for `username`, replacing any existing entry.
pub fn store_password(username: &str, password: &SecretString) -> Result<(), keyring::Error> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, username)?;
    entry.set_password(password.expose_secret())
}

/// Password storage used by the login flow.
pub trait PasswordVault {
    fn get(&self, username: &str) -> Result<Option<SecretString>, keyring::Error>;
    fn set(&self, username: &str, password: &SecretString) -> Result<(), keyring::Error>;
}

/// The platform keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemKeyring;

impl PasswordVault for SystemKeyring {
    fn get(&self, username: &str) -> Result<Option<SecretString>, keyring::Error> {
        stored_password(username)
    }

    fn set(&self, username: &str, password: &SecretString) -> Result<(), keyring::Error> {
        store_password(username, password)
    }
}
