//! Artifact identity, naming schemes, and digest validation.
//!
//! Remote catalog entries arrive as opaque filenames. This module turns them
//! into typed identities that the sync engine can key checksum lookups and
//! sidecar files on.
//!
//! # Sub-modules
//!
//! - [`error`] - Identity and validation error types.
//! - [`identity`] - Resolved artifact identity (`ArtifactIdentity`).
//! - [`md5_digest`] - MD5 digest newtype (`Md5Digest`).
//! - [`naming`] - Ordered naming-scheme strategies and the `Resolver`.
//! - [`version`] - Version token with dash and dot forms (`VersionToken`).

pub mod error;
pub mod identity;
pub mod md5_digest;
pub mod naming;
pub mod version;

pub use error::{IdentityError, ValidationError};
pub use identity::{ArtifactIdentity, SchemeId, Variant};
pub use md5_digest::{Md5Digest, is_format_valid};
pub use naming::{DEFAULT_ARTIFACT_PREFIX, NamingScheme, Resolver};
pub use version::VersionToken;
