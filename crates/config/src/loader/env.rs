//! Environment variable layer.
//!
//! Responsibilities:
//! - Read the recognised environment variables into a `ConfigLayer`.
//! - Provide a helper for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - `.env` file loading (handled by `ConfigLoader::load_dotenv`).
//! - Precedence between layers (see `resolve`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - An unparseable `DURATION` is logged and ignored; other typed values
//!   that fail to parse return `ConfigError::InvalidEnvironmentValue`.

use secrecy::SecretString;

use super::error::ConfigError;
use super::layer::{ConfigLayer, parse_bool, parse_seconds};
use crate::types::LogLevel;

pub const ENV_PROFILE: &str = "AWS_PROFILE";
pub const ENV_LOG_LEVEL: &str = "SSO_LOG_LEVEL";
pub const ENV_USERNAME: &str = "GOOGLE_USERNAME";
pub const ENV_IDP_ID: &str = "GOOGLE_IDP_ID";
pub const ENV_SP_ID: &str = "GOOGLE_SP_ID";
pub const ENV_REGION: &str = "AWS_DEFAULT_REGION";
pub const ENV_DURATION: &str = "DURATION";
pub const ENV_AUTO_DURATION: &str = "AUTO_DURATION";
pub const ENV_ACCOUNT: &str = "AWS_ACCOUNT";
pub const ENV_BG_RESPONSE: &str = "GOOGLE_BG_RESPONSE";
pub const ENV_SAML_ASSERTION: &str = "SAML_ASSERTION";
pub const ENV_ROLE_ARN: &str = "AWS_ROLE_ARN";

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn invalid(var: &str, message: String) -> ConfigError {
    ConfigError::InvalidEnvironmentValue {
        var: var.to_string(),
        message,
    }
}

/// Build the environment layer from the current process environment.
pub fn read_env() -> Result<ConfigLayer, ConfigError> {
    let log_level = env_var_or_none(ENV_LOG_LEVEL)
        .map(|raw| raw.parse::<LogLevel>().map_err(|e| invalid(ENV_LOG_LEVEL, e)))
        .transpose()?;

    let auto_duration = env_var_or_none(ENV_AUTO_DURATION)
        .map(|raw| parse_bool(&raw).map_err(|e| invalid(ENV_AUTO_DURATION, e)))
        .transpose()?;

    let mut duration_fallback = false;
    let duration = env_var_or_none(ENV_DURATION).and_then(|raw| match parse_seconds(&raw) {
        Ok(secs) => Some(secs),
        Err(message) => {
            tracing::warn!(var = ENV_DURATION, %message, "unparseable duration, using the default");
            duration_fallback = true;
            None
        }
    });

    Ok(ConfigLayer {
        profile: env_var_or_none(ENV_PROFILE),
        log_level,
        username: env_var_or_none(ENV_USERNAME),
        idp_id: env_var_or_none(ENV_IDP_ID),
        sp_id: env_var_or_none(ENV_SP_ID),
        region: env_var_or_none(ENV_REGION),
        duration,
        auto_duration,
        account: env_var_or_none(ENV_ACCOUNT),
        bg_response: env_var_or_none(ENV_BG_RESPONSE),
        saml_assertion: env_var_or_none(ENV_SAML_ASSERTION).map(|v| SecretString::new(v.into())),
        role_arn: env_var_or_none(ENV_ROLE_ARN),
        duration_fallback,
        ..ConfigLayer::default()
    })
}
