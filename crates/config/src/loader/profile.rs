//! Config file layer.
//!
//! Responsibilities:
//! - Read one profile section of the AWS config file into a `ConfigLayer`.
//!
//! Does NOT handle:
//! - Locating or creating the file (see `persistence::ProfileStore`).
//! - Writing values back (see `writer`).
//!
//! Invariants:
//! - Tool-specific keys live under the `google_config.` prefix; `region` and
//!   `account` are bare keys shared with the AWS CLI.
//! - A missing section yields an empty layer, not an error.

use super::error::ConfigError;
use super::layer::{ConfigLayer, parse_bool, parse_seconds};
use crate::constants::{
    KEY_ACCOUNT, KEY_ASK_ROLE, KEY_BG_RESPONSE, KEY_DURATION, KEY_IDP_ID, KEY_KEYRING, KEY_REGION,
    KEY_ROLE_ARN, KEY_SP_ID, KEY_U2F_DISABLED, KEY_USERNAME,
};
use crate::persistence::{ProfileDocument, config_profile};

fn typed<T>(
    doc: &ProfileDocument,
    section: &str,
    key: &str,
    parse: fn(&str) -> Result<T, String>,
) -> Result<Option<T>, ConfigError> {
    doc.get(section, key)
        .map(|raw| {
            parse(&raw).map_err(|message| ConfigError::InvalidFileValue {
                key: key.to_string(),
                message,
            })
        })
        .transpose()
}

/// Read the section for `profile` from a loaded config document.
pub fn from_profile_section(
    doc: &ProfileDocument,
    profile: &str,
) -> Result<ConfigLayer, ConfigError> {
    let section = config_profile(profile);
    if !doc.has_section(&section) {
        tracing::debug!(section = %section, path = %doc.path().display(), "profile section not found");
        return Ok(ConfigLayer::default());
    }

    Ok(ConfigLayer {
        username: doc.get(&section, KEY_USERNAME),
        idp_id: doc.get(&section, KEY_IDP_ID),
        sp_id: doc.get(&section, KEY_SP_ID),
        region: doc.get(&section, KEY_REGION),
        account: doc.get(&section, KEY_ACCOUNT),
        duration: typed(doc, &section, KEY_DURATION, parse_seconds)?,
        bg_response: doc.get(&section, KEY_BG_RESPONSE),
        role_arn: doc.get(&section, KEY_ROLE_ARN),
        ask_role: typed(doc, &section, KEY_ASK_ROLE, parse_bool)?,
        keyring: typed(doc, &section, KEY_KEYRING, parse_bool)?,
        disable_second_factor: typed(doc, &section, KEY_U2F_DISABLED, parse_bool)?,
        ..ConfigLayer::default()
    })
}
