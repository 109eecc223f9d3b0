//! The resolved configuration snapshot.
//!
//! Responsibilities:
//! - Hold every field produced by the four-layer merge.
//! - Guard the cached SAML assertion behind its validity window.
//! - Enforce duration bound ordering at construction time.
//!
//! Does NOT handle:
//! - Merging the layers (see `loader` module).
//! - Field validation (see `validation` module).
//!
//! Invariants:
//! - `DurationBounds` always satisfies `0 < min < max <= DURATION_CEILING_SECS`.
//! - `saml_cache()` never returns an assertion outside its `Conditions` window.
//! - `provider` is only ever set by role resolution.

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;

use crate::cache::SamlAssertion;
use crate::constants::{DEFAULT_MAX_DURATION_SECS, DEFAULT_MIN_DURATION_SECS, DURATION_CEILING_SECS};
use crate::validation::BoundsError;

/// Inclusive bounds for the requested session duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    min: u32,
    max: u32,
}

impl DurationBounds {
    /// Create bounds, rejecting `min == 0`, `min >= max`, or `max` above the STS ceiling.
    pub fn new(min: u32, max: u32) -> Result<Self, BoundsError> {
        if min == 0 || min >= max {
            return Err(BoundsError::Ordering { min, max });
        }
        if max > DURATION_CEILING_SECS {
            return Err(BoundsError::Ceiling {
                max,
                ceiling: DURATION_CEILING_SECS,
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_DURATION_SECS,
            max: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

/// Log verbosity accepted by `--log` and `SSO_LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            other => Err(format!("expected one of debug, info, warn (got '{other}')")),
        }
    }
}

/// Fully merged configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Profile section to read from and write to.
    pub profile: String,
    pub log_level: LogLevel,
    /// Google account e-mail.
    pub username: Option<String>,
    /// Google SSO IdP identifier.
    pub idp_id: Option<String>,
    /// Google SSO SP identifier.
    pub sp_id: Option<String>,
    pub region: Option<String>,
    pub bounds: DurationBounds,
    /// Requested credential lifetime in seconds.
    pub duration: u32,
    /// Use `bounds.max()` as the duration.
    pub auto_duration: bool,
    /// Substring filter applied to role ARNs.
    pub account: Option<String>,
    /// Override for the bgresponse challenge token.
    pub bg_response: Option<String>,
    /// Explicit base64 SAML assertion, bypassing cache and login.
    pub saml_assertion: Option<SecretString>,
    pub role_arn: Option<String>,
    /// Always prompt for the role, even when `role_arn` is known.
    pub ask_role: bool,
    /// Principal ARN paired with `role_arn`; set by role resolution.
    pub provider: Option<String>,
    pub use_cache: bool,
    pub print_creds: bool,
    pub resolve_aliases: bool,
    pub save_failure_html: bool,
    pub save_saml_flow: bool,
    /// Read and store the IdP password in the system keyring.
    pub keyring: bool,
    pub disable_second_factor: bool,
    pub quiet: bool,
    pub password: Option<SecretString>,
    saml_cache: Option<SamlAssertion>,
}

impl Config {
    /// A snapshot holding only the hard-coded defaults for `profile`.
    pub fn with_defaults(profile: impl Into<String>, bounds: DurationBounds) -> Self {
        Self {
            profile: profile.into(),
            log_level: LogLevel::default(),
            username: None,
            idp_id: None,
            sp_id: None,
            region: None,
            bounds,
            duration: bounds.max(),
            auto_duration: false,
            account: None,
            bg_response: None,
            saml_assertion: None,
            role_arn: None,
            ask_role: false,
            provider: None,
            use_cache: true,
            print_creds: false,
            resolve_aliases: false,
            save_failure_html: false,
            save_saml_flow: false,
            keyring: false,
            disable_second_factor: true,
            quiet: false,
            password: None,
            saml_cache: None,
        }
    }

    /// The cached assertion, only while its validity window holds.
    pub fn saml_cache(&self) -> Option<&SamlAssertion> {
        self.saml_cache.as_ref().filter(|assertion| assertion.is_valid())
    }

    /// Replace the cached assertion. Invalid content is accepted here and
    /// simply reads back as absent.
    pub fn set_saml_cache(&mut self, assertion: Option<SamlAssertion>) {
        self.saml_cache = assertion;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::assertion_with_window;
    use chrono::{Duration, Utc};
    use secrecy::SecretString;

    #[test]
    fn test_duration_bounds_rejects_inverted_range() {
        assert!(matches!(
            DurationBounds::new(3600, 3600),
            Err(BoundsError::Ordering { .. })
        ));
        assert!(matches!(
            DurationBounds::new(7200, 3600),
            Err(BoundsError::Ordering { .. })
        ));
        assert!(matches!(
            DurationBounds::new(0, 3600),
            Err(BoundsError::Ordering { .. })
        ));
    }

    #[test]
    fn test_duration_bounds_rejects_max_above_ceiling() {
        assert!(matches!(
            DurationBounds::new(900, 43_201),
            Err(BoundsError::Ceiling { .. })
        ));
    }

    #[test]
    fn test_default_snapshot_uses_max_duration() {
        let config = Config::with_defaults("sts", DurationBounds::default());
        assert_eq!(config.duration, 43_200);
        assert!(config.disable_second_factor);
        assert!(config.use_cache);
        assert!(!config.ask_role);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" info ".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("trace".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_expired_cache_reads_as_absent() {
        let now = Utc::now();
        let mut config = Config::with_defaults("sts", DurationBounds::default());
        config.set_saml_cache(Some(assertion_with_window(
            now - Duration::hours(2),
            now - Duration::hours(1),
        )));

        assert!(config.saml_cache().is_none());
    }

    #[test]
    fn test_valid_cache_is_exposed() {
        let now = Utc::now();
        let mut config = Config::with_defaults("sts", DurationBounds::default());
        config.set_saml_cache(Some(assertion_with_window(
            now - Duration::minutes(5),
            now + Duration::minutes(55),
        )));

        assert!(config.saml_cache().is_some());
    }

    #[test]
    fn test_config_debug_does_not_expose_password() {
        let mut config = Config::with_defaults("sts", DurationBounds::default());
        config.password = Some(SecretString::new("hunter2-secret".to_string().into()));

        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("hunter2-secret"));
    }
}
