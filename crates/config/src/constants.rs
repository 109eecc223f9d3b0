//! Centralized constants for the aws-google-auth workspace.
//!
//! This module contains default values and on-disk key names used across
//! crates to avoid magic string duplication.

// =============================================================================
// Profile & Duration Defaults
// =============================================================================

/// Profile used when neither `--profile` nor `AWS_PROFILE` is set.
pub const DEFAULT_PROFILE: &str = "sts";

/// Shortest session duration STS accepts, in seconds.
pub const DEFAULT_MIN_DURATION_SECS: u32 = 900;

/// Longest session duration STS accepts, in seconds (12 hours).
pub const DEFAULT_MAX_DURATION_SECS: u32 = 43_200;

/// Hard ceiling for any configured maximum duration.
pub const DURATION_CEILING_SECS: u32 = 43_200;

// =============================================================================
// Keyring
// =============================================================================

/// Service name used for keyring storage of the IdP password.
pub const KEYRING_SERVICE: &str = "aws-google-auth";

// =============================================================================
// Role ARN
// =============================================================================

/// Accepted role ARN prefixes (commercial and GovCloud partitions).
pub const ROLE_ARN_PREFIXES: [&str; 2] = ["arn:aws:iam::", "arn:aws-us-gov:iam::"];

// =============================================================================
// SAML
// =============================================================================

/// Namespace of the SAML 2.0 assertion schema.
pub const SAML_ASSERTION_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// Timestamp layout used by `NotBefore` / `NotOnOrAfter`.
pub const SAML_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Layout of `aws_session_expiration` in the credentials file.
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

// =============================================================================
// Config file keys
// =============================================================================

pub const KEY_USERNAME: &str = "google_config.google_username";
pub const KEY_IDP_ID: &str = "google_config.google_idp_id";
pub const KEY_SP_ID: &str = "google_config.google_sp_id";
pub const KEY_REGION: &str = "region";
pub const KEY_ACCOUNT: &str = "account";
pub const KEY_DURATION: &str = "google_config.duration";
pub const KEY_BG_RESPONSE: &str = "google_config.bg_response";
pub const KEY_ROLE_ARN: &str = "google_config.role_arn";
pub const KEY_ASK_ROLE: &str = "google_config.ask_role";
pub const KEY_KEYRING: &str = "google_config.keyring";
pub const KEY_U2F_DISABLED: &str = "google_config.u2f_disabled";

// =============================================================================
// Credentials file keys
// =============================================================================

pub const KEY_ACCESS_KEY_ID: &str = "aws_access_key_id";
pub const KEY_SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
pub const KEY_SECURITY_TOKEN: &str = "aws_security_token";
pub const KEY_SESSION_TOKEN: &str = "aws_session_token";
pub const KEY_SESSION_EXPIRATION: &str = "aws_session_expiration";
