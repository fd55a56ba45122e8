//! Version token embedded in artifact filenames.
//!
//! Filenames carry versions in dash form (`1-20-1`); sidecar checksum files
//! use dot form (`1.20.1`). A token is two or three non-empty runs of ASCII
//! digits.

use super::error::ValidationError;
use std::fmt;

/// Dash-form version of the baseline artifact that predates the templated
/// naming scheme.
const LEGACY_VERSION: &str = "1-12-2";

const MIN_COMPONENTS: usize = 2;
const MAX_COMPONENTS: usize = 3;

/// A validated `major-minor(-patch)` version token.
///
/// # Examples
///
/// ```
/// use modpack_mirror::artefact::version::VersionToken;
///
/// let version = VersionToken::try_from("1-20-1").expect("valid token");
/// assert_eq!(version.dash_form(), "1-20-1");
/// assert_eq!(version.dot_form(), "1.20.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    /// The fixed version of the legacy baseline artifact.
    #[must_use]
    pub fn legacy() -> Self {
        Self(LEGACY_VERSION.to_owned())
    }

    /// Return the token as it appears in artifact filenames.
    #[must_use]
    pub fn dash_form(&self) -> &str {
        &self.0
    }

    /// Return the token as it appears in sidecar checksum filenames.
    #[must_use]
    pub fn dot_form(&self) -> String {
        self.0.replace('-', ".")
    }
}

impl TryFrom<&str> for VersionToken {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| ValidationError::InvalidVersion {
            value: value.to_owned(),
            reason: reason.to_owned(),
        };

        let components: Vec<&str> = value.split('-').collect();
        if !(MIN_COMPONENTS..=MAX_COMPONENTS).contains(&components.len()) {
            return Err(invalid("expected major-minor or major-minor-patch"));
        }
        if components
            .iter()
            .any(|part| part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(invalid("components must be non-empty decimal numbers"));
        }
        Ok(Self(value.to_owned()))
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dot_form())
    }
}
