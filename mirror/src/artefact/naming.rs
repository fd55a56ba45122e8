//! Naming-scheme strategies for remote artifact filenames.
//!
//! The catalog has used two incompatible conventions over time:
//!
//! - the legacy literal `{prefix}.zip`, which always denotes version 1.12.2;
//! - the templated `{prefix}-{major}-{minor}[-{patch}][-Fabric].zip`.
//!
//! Each convention is a [`NamingScheme`]. The [`Resolver`] tries its schemes
//! in priority order and rejects filenames that none of them recognise.

use super::error::IdentityError;
use super::identity::{ArtifactIdentity, SchemeId, Variant};
use super::version::VersionToken;
use log::trace;
use std::fmt;

/// Filename prefix shared by every artifact in the upstream catalog.
pub const DEFAULT_ARTIFACT_PREFIX: &str = "Minecraft-Mod-Language-Modpack";

/// File extension of artifact archives.
const ARTIFACT_EXTENSION: &str = ".zip";

/// A single filename convention.
pub trait NamingScheme: fmt::Debug {
    /// Identify the scheme.
    fn id(&self) -> SchemeId;

    /// Parse `filename`, returning `None` when it does not follow this scheme.
    fn try_parse(&self, filename: &str) -> Option<ArtifactIdentity>;
}

/// The literal filename of the baseline release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyScheme {
    filename: String,
}

impl LegacyScheme {
    /// Create the scheme for artifacts named with `prefix`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            filename: format!("{prefix}{ARTIFACT_EXTENSION}"),
        }
    }
}

impl NamingScheme for LegacyScheme {
    fn id(&self) -> SchemeId {
        SchemeId::Legacy
    }

    fn try_parse(&self, filename: &str) -> Option<ArtifactIdentity> {
        (filename == self.filename).then(|| {
            ArtifactIdentity::new(
                filename,
                VersionToken::legacy(),
                Variant::Standard,
                SchemeId::Legacy,
            )
        })
    }
}

/// `{prefix}-{version}[-Fabric].zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatedScheme {
    prefix: String,
}

impl TemplatedScheme {
    /// Create the scheme for artifacts named with `prefix`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
        }
    }
}

impl NamingScheme for TemplatedScheme {
    fn id(&self) -> SchemeId {
        SchemeId::Templated
    }

    fn try_parse(&self, filename: &str) -> Option<ArtifactIdentity> {
        let stem = filename
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')?
            .strip_suffix(ARTIFACT_EXTENSION)?;

        let marker = Variant::Fabric.filename_marker();
        let (token, variant) = match stem.strip_suffix(marker) {
            Some(token) => (token, Variant::Fabric),
            None => (stem, Variant::Standard),
        };

        let version = VersionToken::try_from(token).ok()?;
        Some(ArtifactIdentity::new(
            filename,
            version,
            variant,
            SchemeId::Templated,
        ))
    }
}

/// Resolves filenames by trying each naming scheme in order.
///
/// # Examples
///
/// ```
/// use modpack_mirror::artefact::naming::Resolver;
/// use modpack_mirror::artefact::identity::Variant;
///
/// let resolver = Resolver::default();
/// let identity = resolver
///     .resolve("Minecraft-Mod-Language-Modpack-1-20-Fabric.zip")
///     .expect("recognised filename");
/// assert_eq!(identity.version().dot_form(), "1.20");
/// assert_eq!(identity.variant(), Variant::Fabric);
///
/// assert!(resolver.resolve("README.txt").is_err());
/// ```
#[derive(Debug)]
pub struct Resolver {
    schemes: Vec<Box<dyn NamingScheme>>,
}

impl Resolver {
    /// Create a resolver with the built-in schemes for `prefix`.
    ///
    /// The legacy literal is checked first so that it never falls through to
    /// the general grammar.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self::with_schemes(vec![
            Box::new(LegacyScheme::new(prefix)),
            Box::new(TemplatedScheme::new(prefix)),
        ])
    }

    /// Create a resolver from an explicit, ordered scheme list.
    #[must_use]
    pub fn with_schemes(schemes: Vec<Box<dyn NamingScheme>>) -> Self {
        Self { schemes }
    }

    /// Resolve `filename` into an identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnrecognisedFilename`] when no scheme
    /// accepts the filename.
    pub fn resolve(&self, filename: &str) -> Result<ArtifactIdentity, IdentityError> {
        self.schemes
            .iter()
            .find_map(|scheme| {
                let identity = scheme.try_parse(filename);
                if identity.is_some() {
                    trace!("{filename} matched naming scheme {:?}", scheme.id());
                }
                identity
            })
            .ok_or_else(|| IdentityError::UnrecognisedFilename {
                filename: filename.to_owned(),
            })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT_PREFIX)
    }
}
