//! One precedence layer of configuration values.
//!
//! Responsibilities:
//! - Hold every recognised field as an `Option`, one struct per source.
//! - Overlay a higher layer onto a lower one field by field.
//! - Parse the textual booleans and integers shared by the file and env sources.
//!
//! Does NOT handle:
//! - Reading any source (see `env.rs` and `profile.rs`).
//! - Applying defaults or mutual exclusion (see `resolve`).
//!
//! Invariants:
//! - `None` means "this layer says nothing"; it never clears a lower value.

use secrecy::SecretString;

use crate::types::LogLevel;

/// Values contributed by a single source (config file, environment, or CLI).
#[derive(Debug, Clone, Default)]
pub struct ConfigLayer {
    pub profile: Option<String>,
    pub log_level: Option<LogLevel>,
    pub username: Option<String>,
    pub idp_id: Option<String>,
    pub sp_id: Option<String>,
    pub region: Option<String>,
    pub duration: Option<u32>,
    pub auto_duration: Option<bool>,
    pub account: Option<String>,
    pub bg_response: Option<String>,
    pub saml_assertion: Option<SecretString>,
    pub role_arn: Option<String>,
    pub ask_role: Option<bool>,
    pub use_cache: Option<bool>,
    pub print_creds: Option<bool>,
    pub resolve_aliases: Option<bool>,
    pub save_failure_html: Option<bool>,
    pub save_saml_flow: Option<bool>,
    pub keyring: Option<bool>,
    pub disable_second_factor: Option<bool>,
    pub quiet: Option<bool>,
    /// The source held a duration it could not parse. The duration then
    /// resolves to the default unless a higher layer sets one.
    pub duration_fallback: bool,
}

impl ConfigLayer {
    /// Keep every value `self` sets and fill the rest from `lower`.
    pub fn overlay(self, lower: ConfigLayer) -> ConfigLayer {
        let speaks_duration = self.duration.is_some() || self.duration_fallback;
        let (duration, duration_fallback) = if speaks_duration {
            (self.duration, self.duration_fallback)
        } else {
            (lower.duration, lower.duration_fallback)
        };

        ConfigLayer {
            profile: self.profile.or(lower.profile),
            log_level: self.log_level.or(lower.log_level),
            username: self.username.or(lower.username),
            idp_id: self.idp_id.or(lower.idp_id),
            sp_id: self.sp_id.or(lower.sp_id),
            region: self.region.or(lower.region),
            duration,
            auto_duration: self.auto_duration.or(lower.auto_duration),
            account: self.account.or(lower.account),
            bg_response: self.bg_response.or(lower.bg_response),
            saml_assertion: self.saml_assertion.or(lower.saml_assertion),
            role_arn: self.role_arn.or(lower.role_arn),
            ask_role: self.ask_role.or(lower.ask_role),
            use_cache: self.use_cache.or(lower.use_cache),
            print_creds: self.print_creds.or(lower.print_creds),
            resolve_aliases: self.resolve_aliases.or(lower.resolve_aliases),
            save_failure_html: self.save_failure_html.or(lower.save_failure_html),
            save_saml_flow: self.save_saml_flow.or(lower.save_saml_flow),
            keyring: self.keyring.or(lower.keyring),
            disable_second_factor: self.disable_second_factor.or(lower.disable_second_factor),
            quiet: self.quiet.or(lower.quiet),
            duration_fallback,
        }
    }
}

/// Parse `true`/`false` (any case) and `1`/`0`.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err("must be true or false".to_string()),
    }
}

/// Parse a whole number of seconds.
pub(crate) fn parse_seconds(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("must be a whole number of seconds (got '{}')", raw.trim()))
}
