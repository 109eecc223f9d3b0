//! Temporary credentials issued by the credential broker.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Short-lived STS credentials for the assumed role.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: SecretString,
    pub expiration: DateTime<Utc>,
}
