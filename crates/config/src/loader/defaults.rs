//! Hard-coded defaults, the lowest precedence layer.
//!
//! Invariants:
//! - `bounds` is always ordered (enforced by `DurationBounds::new`).
//! - The default duration is `bounds.max()`.

use crate::constants::DEFAULT_PROFILE;
use crate::types::DurationBounds;

/// Defaults applied when no layer provides a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Profile used when neither the CLI nor `AWS_PROFILE` names one.
    pub profile: String,
    pub bounds: DurationBounds,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            bounds: DurationBounds::default(),
        }
    }
}
