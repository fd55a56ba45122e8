//! MD5 digest newtype for checksum comparison.
//!
//! Accepts exactly 32 hexadecimal characters in either case and stores them
//! in lowercase, so two digests compare equal whenever they denote the same
//! 128-bit value.

use super::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Expected length of a hex-encoded MD5 digest.
const DIGEST_HEX_LEN: usize = 32;

/// A validated, lowercase hex-encoded MD5 digest.
///
/// # Examples
///
/// ```
/// use modpack_mirror::artefact::md5_digest::Md5Digest;
///
/// let digest = Md5Digest::try_from("D41D8CD98F00B204E9800998ECF8427E").expect("valid digest");
/// assert_eq!(digest.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Md5Digest(String);

impl Md5Digest {
    /// Wrap hex produced by the MD5 hasher.
    ///
    /// The hasher always emits 32 lowercase hex characters, so no validation
    /// is repeated here.
    pub(crate) fn from_computed(hex: String) -> Self {
        debug_assert!(is_format_valid(&hex));
        Self(hex)
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Md5Digest {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_md5(value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Md5Digest {
    type Error = ValidationError;

    fn try_from(mut value: String) -> Result<Self, Self::Error> {
        validate_md5(&value)?;
        value.make_ascii_lowercase();
        Ok(Self(value))
    }
}

impl FromStr for Md5Digest {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl AsRef<str> for Md5Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return whether `value` is a syntactically valid MD5 digest.
///
/// Both cases are accepted; [`Md5Digest`] normalises to lowercase.
///
/// # Examples
///
/// ```
/// use modpack_mirror::artefact::md5_digest::is_format_valid;
///
/// assert!(is_format_valid("d41d8cd98f00b204e9800998ecf8427e"));
/// assert!(!is_format_valid("not-a-real-digest"));
/// ```
#[must_use]
pub fn is_format_valid(value: &str) -> bool {
    validate_md5(value).is_ok()
}

fn validate_md5(value: &str) -> Result<(), ValidationError> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(ValidationError::InvalidDigest {
            value: value.to_owned(),
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidDigest {
            value: value.to_owned(),
            reason: format!("non-hex character '{bad}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

    #[test]
    fn accepts_lowercase_digest() {
        let digest = Md5Digest::try_from(EMPTY_MD5).expect("valid digest");
        assert_eq!(digest.as_str(), EMPTY_MD5);
    }

    #[test]
    fn normalises_uppercase_to_lowercase() {
        let digest = Md5Digest::try_from(EMPTY_MD5.to_uppercase()).expect("valid digest");
        assert_eq!(digest.as_str(), EMPTY_MD5);
    }

    #[test]
    fn mixed_case_digests_compare_equal() {
        let lower = Md5Digest::try_from(EMPTY_MD5).expect("valid");
        let mixed = Md5Digest::try_from("D41d8CD98f00b204e9800998ECF8427e").expect("valid");
        assert_eq!(lower, mixed);
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("abcdef")]
    #[case::too_long("d41d8cd98f00b204e9800998ecf8427e0")]
    #[case::non_hex("z41d8cd98f00b204e9800998ecf8427e")]
    #[case::prose("not-a-real-digest")]
    #[case::padded(" d41d8cd98f00b204e9800998ecf8427")]
    fn rejects_malformed_digests(#[case] value: &str) {
        assert!(!is_format_valid(value));
        assert!(Md5Digest::try_from(value).is_err());
    }

    #[test]
    fn rejection_names_the_offending_character() {
        let err = Md5Digest::try_from("g41d8cd98f00b204e9800998ecf8427e").expect_err("non-hex");
        assert!(err.to_string().contains("'g'"));
    }

    #[test]
    fn display_shows_full_digest() {
        let digest: Md5Digest = EMPTY_MD5.parse().expect("valid");
        assert_eq!(format!("{digest}"), EMPTY_MD5);
    }
}
