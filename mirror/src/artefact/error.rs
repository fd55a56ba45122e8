//! Error types for artifact identity resolution and digest validation.
//!
//! Each variant names the rejected input and the constraint it violated.

use thiserror::Error;

/// A remote filename matched none of the known naming schemes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No naming scheme recognised the filename.
    #[error("unrecognised artifact filename \"{filename}\"")]
    UnrecognisedFilename {
        /// The rejected filename.
        filename: String,
    },
}

/// A value failed a syntactic check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A digest string is not 32 hexadecimal characters.
    #[error("invalid MD5 digest \"{value}\": {reason}")]
    InvalidDigest {
        /// The rejected digest text.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A version token does not follow the `major-minor(-patch)` grammar.
    #[error("invalid version token \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected token.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}
