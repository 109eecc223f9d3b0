//! Validation rules for the resolved configuration.
//!
//! Responsibilities:
//! - Bounds-check integer fields with distinct below-minimum / above-maximum errors.
//! - Pattern-check identity strings and the role ARN prefix.
//! - Report which required fields are still missing.
//!
//! Does NOT handle:
//! - Prompting for missing values (see `interactive` module).
//! - Merging configuration layers (see `loader` module).
//!
//! Invariants:
//! - Every function here is pure: no terminal or file I/O.
//! - Rule bound ordering (`min < max`) is checked when a rule is built, and is
//!   reported as `BoundsError` rather than `ValidationError`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::constants::ROLE_ARN_PREFIXES;
use crate::types::{Config, DurationBounds};

/// A validated configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Profile,
    Username,
    Password,
    IdpId,
    SpId,
    Region,
    Account,
    Duration,
    RoleArn,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Profile => "profile",
            Field::Username => "username",
            Field::Password => "password",
            Field::IdpId => "idp_id",
            Field::SpId => "sp_id",
            Field::Region => "region",
            Field::Account => "account",
            Field::Duration => "duration",
            Field::RoleArn => "role_arn",
        }
    }

    /// Input for this field must be masked when prompted.
    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password)
    }

    /// Human-readable prompt label.
    pub fn prompt(&self) -> &'static str {
        match self {
            Field::Profile => "AWS profile",
            Field::Username => "Google username",
            Field::Password => "Google password",
            Field::IdpId => "Google IDP ID",
            Field::SpId => "Google SP ID",
            Field::Region => "AWS region",
            Field::Account => "AWS account",
            Field::Duration => "Duration in seconds",
            Field::RoleArn => "Role ARN",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A rule was constructed with inconsistent bounds. This is a programming error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    #[error("programming error: min ({min}) must be greater than 0 and less than max ({max})")]
    Ordering { min: u32, max: u32 },

    #[error("programming error: max ({max}) exceeds the ceiling of {ceiling}")]
    Ceiling { max: u32, ceiling: u32 },
}

/// A user-supplied value failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: Field },

    #[error("Bounds Check Error: {field} value {value} less than {min}")]
    BelowMinimum { field: Field, value: u32, min: u32 },

    #[error("Bounds Check Error: {field} value {value} greater than {max}")]
    AboveMaximum { field: Field, value: u32, max: u32 },

    #[error("{field} must be an integer (got '{value}')")]
    NotAnInteger { field: Field, value: String },

    #[error("{field} does not match expected pattern {pattern}")]
    PatternMismatch { field: Field, pattern: &'static str },

    #[error("role_arn must start with one of {prefixes:?} (got '{value}')")]
    InvalidRoleArn {
        value: String,
        prefixes: [&'static str; 2],
    },
}

impl ValidationError {
    /// The field this error refers to.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Missing { field }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::NotAnInteger { field, .. }
            | ValidationError::PatternMismatch { field, .. } => *field,
            ValidationError::InvalidRoleArn { .. } => Field::RoleArn,
        }
    }
}

/// Inclusive integer bounds for one field.
#[derive(Debug, Clone, Copy)]
pub struct IntRule {
    field: Field,
    min: u32,
    max: u32,
}

impl IntRule {
    pub fn new(field: Field, min: u32, max: u32) -> Result<Self, BoundsError> {
        if min >= max {
            return Err(BoundsError::Ordering { min, max });
        }
        Ok(Self { field, min, max })
    }

    /// Build from bounds that already guarantee `min < max`.
    pub fn from_bounds(field: Field, bounds: DurationBounds) -> Self {
        Self {
            field,
            min: bounds.min(),
            max: bounds.max(),
        }
    }

    pub fn check(&self, value: u32) -> Result<u32, ValidationError> {
        if value < self.min {
            return Err(ValidationError::BelowMinimum {
                field: self.field,
                value,
                min: self.min,
            });
        }
        if value > self.max {
            return Err(ValidationError::AboveMaximum {
                field: self.field,
                value,
                max: self.max,
            });
        }
        Ok(value)
    }

    /// Parse then bounds-check a textual answer.
    pub fn check_str(&self, raw: &str) -> Result<u32, ValidationError> {
        let value = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::NotAnInteger {
                field: self.field,
                value: raw.trim().to_string(),
            })?;
        self.check(value)
    }
}

const PROFILE_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_-]*[A-Za-z0-9]*$";
const USERNAME_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const IDP_ID_PATTERN: &str = r"^[A-Za-z0-9]+$";
const SP_ID_PATTERN: &str = r"^[0-9]+$";
const REGION_PATTERN: &str = r"^[a-z]{2}(-gov)?-[a-z]+-[0-9]+$";
const ACCOUNT_PATTERN: &str = r"^[0-9]{1,12}$";

static PROFILE_RE: LazyLock<Regex> = LazyLock::new(|| compile(PROFILE_PATTERN));
static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| compile(USERNAME_PATTERN));
static IDP_ID_RE: LazyLock<Regex> = LazyLock::new(|| compile(IDP_ID_PATTERN));
static SP_ID_RE: LazyLock<Regex> = LazyLock::new(|| compile(SP_ID_PATTERN));
static REGION_RE: LazyLock<Regex> = LazyLock::new(|| compile(REGION_PATTERN));
static ACCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| compile(ACCOUNT_PATTERN));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static validation pattern must compile")
}

fn pattern_for(field: Field) -> Option<(&'static str, &'static Regex)> {
    match field {
        Field::Profile => Some((PROFILE_PATTERN, &PROFILE_RE)),
        Field::Username => Some((USERNAME_PATTERN, &USERNAME_RE)),
        Field::IdpId => Some((IDP_ID_PATTERN, &IDP_ID_RE)),
        Field::SpId => Some((SP_ID_PATTERN, &SP_ID_RE)),
        Field::Region => Some((REGION_PATTERN, &REGION_RE)),
        Field::Account => Some((ACCOUNT_PATTERN, &ACCOUNT_RE)),
        Field::Password | Field::Duration | Field::RoleArn => None,
    }
}

/// Check a role ARN against the accepted partition prefixes.
pub fn check_role_arn(value: &str) -> Result<(), ValidationError> {
    if ROLE_ARN_PREFIXES
        .iter()
        .any(|prefix| value.starts_with(prefix))
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidRoleArn {
            value: value.to_string(),
            prefixes: ROLE_ARN_PREFIXES,
        })
    }
}

/// Validate one candidate string value for `field`.
///
/// Blank input is `Missing`. `Duration` is checked against the default bounds;
/// use `IntRule` directly for snapshot-specific bounds.
pub fn check_field(field: Field, raw: &str) -> Result<(), ValidationError> {
    let value = if field.is_secret() { raw } else { raw.trim() };
    if value.trim().is_empty() {
        return Err(ValidationError::Missing { field });
    }

    match field {
        Field::RoleArn => check_role_arn(value),
        Field::Duration => IntRule::from_bounds(field, DurationBounds::default())
            .check_str(value)
            .map(|_| ()),
        _ => match pattern_for(field) {
            Some((pattern, re)) if !re.is_match(value) => {
                Err(ValidationError::PatternMismatch { field, pattern })
            }
            _ => Ok(()),
        },
    }
}

/// Current textual value of a string field, ignoring blanks.
fn field_present(config: &Config, field: Field) -> bool {
    let value = match field {
        Field::Profile => Some(config.profile.as_str()),
        Field::Username => config.username.as_deref(),
        Field::Password => config.password.as_ref().map(|p| p.expose_secret()),
        Field::IdpId => config.idp_id.as_deref(),
        Field::SpId => config.sp_id.as_deref(),
        Field::Region => config.region.as_deref(),
        Field::Account => config.account.as_deref(),
        Field::RoleArn => config.role_arn.as_deref(),
        Field::Duration => return true,
    };
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Return the subset of `required` that is absent or blank, in order.
pub fn missing(config: &Config, required: &[Field]) -> Vec<Field> {
    required
        .iter()
        .copied()
        .filter(|field| !field_present(config, *field))
        .collect()
}

/// Validate a merged snapshot. Absent optional fields pass.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    check_field(Field::Profile, &config.profile)?;

    IntRule::from_bounds(Field::Duration, config.bounds).check(config.duration)?;

    let optional = [
        (Field::Username, config.username.as_deref()),
        (Field::IdpId, config.idp_id.as_deref()),
        (Field::SpId, config.sp_id.as_deref()),
        (Field::Region, config.region.as_deref()),
        (Field::Account, config.account.as_deref()),
        (Field::RoleArn, config.role_arn.as_deref()),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            check_field(field, value)?;
        }
    }

    Ok(())
}
