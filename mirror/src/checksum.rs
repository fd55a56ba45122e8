//! Local and remote MD5 digests.
//!
//! Local digests are computed by streaming the file through the hasher in
//! fixed-size chunks. Remote digests are read from a sidecar text file that
//! sits next to the artifacts on the server.

use crate::artefact::{ArtifactIdentity, Md5Digest, ValidationError};
use crate::error::SyncError;
use crate::retry::RetryPolicy;
use crate::transfer::TransferClient;
use camino::Utf8Path;
use log::debug;
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};

/// Read buffer size used while hashing.
pub const CHUNK_SIZE: usize = 4096;

/// Compute the MD5 digest of the file at `path`.
///
/// # Errors
///
/// Returns an I/O error when the file cannot be opened or read.
pub fn compute_md5(path: &Utf8Path) -> io::Result<Md5Digest> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = [0_u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(buffer.get(..read).unwrap_or_default());
    }

    Ok(Md5Digest::from_computed(format!("{:x}", hasher.finalize())))
}

/// Return the digest of the local file, or `None` when it is absent or
/// unreadable.
#[must_use]
pub fn local_digest(path: &Utf8Path) -> Option<Md5Digest> {
    match compute_md5(path) {
        Ok(digest) => Some(digest),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            debug!("cannot hash {path}: {err}");
            None
        }
    }
}

/// Parse a sidecar body into a digest.
///
/// The body is decoded leniently and surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDigest`] when the trimmed text is not
/// 32 hexadecimal characters.
pub fn parse_remote_digest(body: &[u8]) -> Result<Md5Digest, ValidationError> {
    let text = String::from_utf8_lossy(body);
    Md5Digest::try_from(text.trim())
}

/// Looks up published digests for catalog artifacts.
pub struct ChecksumOracle<'a> {
    client: &'a dyn TransferClient,
    retry: RetryPolicy,
    base_url: &'a str,
}

impl<'a> ChecksumOracle<'a> {
    /// Create an oracle that fetches sidecars relative to `base_url`.
    ///
    /// `base_url` must end with `/`.
    #[must_use]
    pub fn new(client: &'a dyn TransferClient, retry: RetryPolicy, base_url: &'a str) -> Self {
        Self {
            client,
            retry,
            base_url,
        }
    }

    /// Return the URL of the sidecar for `identity`.
    #[must_use]
    pub fn sidecar_url(&self, identity: &ArtifactIdentity) -> String {
        format!("{}{}", self.base_url, identity.sidecar_filename())
    }

    /// Fetch and validate the published digest for `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Network`] when every attempt fails and
    /// [`SyncError::Validation`] when the sidecar body is not a digest.
    /// Malformed bodies are not retried.
    pub fn remote_digest(&self, identity: &ArtifactIdentity) -> Result<Md5Digest, SyncError> {
        let url = self.sidecar_url(identity);
        let operation = format!("fetch sidecar {}", identity.sidecar_filename());
        let body = self.retry.run(&operation, || self.client.get(&url))?;
        Ok(parse_remote_digest(&body)?)
    }
}
