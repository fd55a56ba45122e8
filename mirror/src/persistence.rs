//! Writes artifacts and checksum sidecars into the target directory.
//!
//! Artifact bytes are first written to a temporary file beside the
//! destination and then renamed over it, so an interrupted or failed write
//! never leaves a truncated archive under the artifact's name.

use crate::artefact::{ArtifactIdentity, Md5Digest};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use std::io::{self, Write};
use thiserror::Error;

/// Filename prefix of in-flight temporary files.
const TEMP_PREFIX: &str = ".partial-";

/// Creation mode of staged artifacts before the process umask applies,
/// matching what `fs::write` produces.
#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o666;

/// A local filesystem operation failed.
#[derive(Debug, Error)]
pub enum FileError {
    /// The target directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The destination path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The path that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A file could not be removed.
    #[error("failed to remove {path}: {source}")]
    Remove {
        /// The path that could not be removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// The local mirror directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    target_dir: Utf8PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `target_dir`.
    #[must_use]
    pub fn new(target_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    /// Return the target directory.
    #[must_use]
    pub fn target_dir(&self) -> &Utf8Path {
        &self.target_dir
    }

    /// Create the target directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::CreateDirectory`] when creation fails.
    pub fn prepare(&self) -> Result<(), FileError> {
        fs::create_dir_all(&self.target_dir).map_err(|source| FileError::CreateDirectory {
            path: self.target_dir.clone(),
            source,
        })
    }

    /// Return the local path of the artifact named `filename`.
    #[must_use]
    pub fn artifact_path(&self, filename: &str) -> Utf8PathBuf {
        self.target_dir.join(filename)
    }

    /// Return the local path of the sidecar for `identity`.
    #[must_use]
    pub fn sidecar_path(&self, identity: &ArtifactIdentity) -> Utf8PathBuf {
        self.target_dir.join(identity.sidecar_filename())
    }

    /// Replace the file at `path` with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Write`] when the temporary file cannot be
    /// created, written, or renamed. The destination is untouched on failure.
    pub fn write_artifact(&self, path: &Utf8Path, bytes: &[u8]) -> Result<(), FileError> {
        let write_error = |source| FileError::Write {
            path: path.to_owned(),
            source,
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(ARTIFACT_MODE));
        }

        let mut staged = builder
            .tempfile_in(&self.target_dir)
            .map_err(write_error)?;
        staged.write_all(bytes).map_err(write_error)?;
        staged.flush().map_err(write_error)?;
        staged
            .persist(path)
            .map_err(|err| write_error(err.error))?;

        debug!("wrote {} byte(s) to {path}", bytes.len());
        Ok(())
    }

    /// Write `digest` to the sidecar at `path` as bare lowercase hex.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Write`] when the file cannot be written.
    pub fn write_sidecar(&self, path: &Utf8Path, digest: &Md5Digest) -> Result<(), FileError> {
        fs::write(path, digest.as_str()).map_err(|source| FileError::Write {
            path: path.to_owned(),
            source,
        })
    }

    /// Remove the file at `path` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Remove`] when an existing file cannot be removed.
    pub fn discard(&self, path: &Utf8Path) -> Result<(), FileError> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("removed {path}");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileError::Remove {
                path: path.to_owned(),
                source,
            }),
        }
    }
}
