//! Merge of the four precedence layers into a `Config`.
//!
//! Responsibilities:
//! - Apply CLI > environment > config file > default, field by field.
//! - Enforce the CLI-level mutual exclusions (`role_arn`/`ask_role`,
//!   `duration`/`auto_duration`).
//!
//! Does NOT handle:
//! - Reading any layer (see `env.rs`, `profile.rs`).
//! - Validating field contents (see `validation::validate`).
//!
//! Invariants:
//! - The result depends only on the four inputs, never on the order the
//!   builder collected them.
//! - `auto_duration` always resolves `duration` to `bounds.max()`.

use super::defaults::Defaults;
use super::error::ConfigError;
use super::layer::ConfigLayer;
use crate::types::Config;

/// Merge `cli` over `env` over `file` over `defaults`.
pub fn resolve(
    defaults: &Defaults,
    file: ConfigLayer,
    env: ConfigLayer,
    mut cli: ConfigLayer,
) -> Result<Config, ConfigError> {
    if cli.role_arn.is_some() && cli.ask_role == Some(true) {
        return Err(ConfigError::Conflict {
            first: "role-arn",
            second: "ask-role",
        });
    }
    if cli.duration.is_some() && cli.auto_duration == Some(true) {
        return Err(ConfigError::Conflict {
            first: "duration",
            second: "auto-duration",
        });
    }

    // One of a pair on the command line switches the other off.
    if cli.role_arn.is_some() {
        cli.ask_role = Some(false);
    }
    if cli.duration.is_some() {
        cli.auto_duration = Some(false);
    }
    let clear_role_arn = cli.ask_role == Some(true);

    let merged = cli.overlay(env).overlay(file);
    let bounds = defaults.bounds;

    let mut config = Config::with_defaults(
        merged.profile.unwrap_or_else(|| defaults.profile.clone()),
        bounds,
    );

    let auto_duration = merged.auto_duration.unwrap_or(false);
    config.auto_duration = auto_duration;
    config.duration = if auto_duration {
        bounds.max()
    } else {
        merged.duration.unwrap_or(bounds.max())
    };

    config.log_level = merged.log_level.unwrap_or_default();
    config.username = merged.username;
    config.idp_id = merged.idp_id;
    config.sp_id = merged.sp_id;
    config.region = merged.region;
    config.account = merged.account;
    config.bg_response = merged.bg_response;
    config.saml_assertion = merged.saml_assertion;
    config.role_arn = if clear_role_arn { None } else { merged.role_arn };
    config.ask_role = merged.ask_role.unwrap_or(config.ask_role);
    config.use_cache = merged.use_cache.unwrap_or(config.use_cache);
    config.print_creds = merged.print_creds.unwrap_or(config.print_creds);
    config.resolve_aliases = merged.resolve_aliases.unwrap_or(config.resolve_aliases);
    config.save_failure_html = merged.save_failure_html.unwrap_or(config.save_failure_html);
    config.save_saml_flow = merged.save_saml_flow.unwrap_or(config.save_saml_flow);
    config.keyring = merged.keyring.unwrap_or(config.keyring);
    config.disable_second_factor = merged
        .disable_second_factor
        .unwrap_or(config.disable_second_factor);
    config.quiet = merged.quiet.unwrap_or(config.quiet);

    tracing::debug!(
        profile = %config.profile,
        duration = config.duration,
        auto_duration = config.auto_duration,
        ask_role = config.ask_role,
        "configuration resolved"
    );
    Ok(config)
}
