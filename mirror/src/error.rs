//! Error types for the mirror.
//!
//! Per-artifact failures are collected into [`SyncError`] and never abort the
//! run. [`MirrorError`] covers the outcomes that end the process with a
//! non-zero status.

use crate::artefact::{IdentityError, Md5Digest, ValidationError};
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::FileError;
use crate::transfer::NetworkError;
use thiserror::Error;

/// Broad category of a per-artifact failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The filename matched no naming scheme.
    Identity,
    /// A digest or version string was malformed.
    Validation,
    /// A transfer failed after exhausting its retries.
    Network,
    /// A local file could not be written, read, or removed.
    File,
    /// The transferred bytes did not hash to the published digest.
    ChecksumMismatch,
}

/// A failure that ends processing of one artifact.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote filename could not be resolved.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The published digest was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A sidecar or artifact transfer failed.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Writing the artifact or its sidecar failed.
    #[error(transparent)]
    File(#[from] FileError),

    /// The transferred artifact did not match its published digest.
    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The artifact filename.
        filename: String,
        /// Digest published by the remote sidecar.
        expected: Md5Digest,
        /// Digest of the bytes that were written.
        actual: Md5Digest,
    },
}

impl SyncError {
    /// Return the broad category of this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Identity(_) => ErrorKind::Identity,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Network(_) => ErrorKind::Network,
            Self::File(_) => ErrorKind::File,
            Self::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
        }
    }
}

/// Errors that end a mirror run.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog listing could not be fetched.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The target directory could not be created.
    #[error("cannot prepare target directory: {0}")]
    TargetDirectory(#[from] FileError),

    /// The run completed but some artifacts failed.
    #[error("{failed} of {total} artifact(s) failed to synchronise")]
    ArtifactsFailed {
        /// Number of failed artifacts.
        failed: u64,
        /// Number of catalog entries processed.
        total: u64,
    },
}

/// Convenience alias for results with [`MirrorError`].
pub type Result<T> = std::result::Result<T, MirrorError>;
