//! Resolved artifact identity.
//!
//! An identity is the `(version, variant)` pair extracted from a remote
//! filename, together with the naming scheme that recognised it. It keys the
//! remote checksum lookup and the local sidecar filename.

use super::version::VersionToken;
use std::fmt;

/// Sidecar filename of the legacy baseline artifact.
const LEGACY_SIDECAR: &str = "1.12.2.md5";

/// Extension of sidecar checksum files.
const SIDECAR_EXTENSION: &str = ".md5";

/// Build flavour marker carried in the filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// No flavour marker.
    #[default]
    Standard,
    /// Built for the Fabric mod loader (`-Fabric` marker).
    Fabric,
}

impl Variant {
    /// Marker that identifies this variant in artifact filenames.
    #[must_use]
    pub const fn filename_marker(self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::Fabric => "-Fabric",
        }
    }

    /// Suffix appended to the dot-form version in sidecar filenames.
    #[must_use]
    pub const fn sidecar_suffix(self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::Fabric => "-fabric",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Fabric => f.write_str("fabric"),
        }
    }
}

/// The naming scheme that produced an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeId {
    /// The single literal filename of the baseline release.
    Legacy,
    /// `{prefix}-{version}[-Fabric].zip`.
    Templated,
}

/// Structured identity of one catalog artifact.
///
/// # Examples
///
/// ```
/// use modpack_mirror::artefact::identity::{ArtifactIdentity, SchemeId, Variant};
/// use modpack_mirror::artefact::version::VersionToken;
///
/// let identity = ArtifactIdentity::new(
///     "Minecraft-Mod-Language-Modpack-1-20-Fabric.zip",
///     VersionToken::try_from("1-20").expect("valid token"),
///     Variant::Fabric,
///     SchemeId::Templated,
/// );
/// assert_eq!(identity.sidecar_filename(), "1.20-fabric.md5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactIdentity {
    raw_filename: String,
    version: VersionToken,
    variant: Variant,
    scheme: SchemeId,
}

impl ArtifactIdentity {
    /// Create an identity from resolved components.
    #[must_use]
    pub fn new(
        raw_filename: impl Into<String>,
        version: VersionToken,
        variant: Variant,
        scheme: SchemeId,
    ) -> Self {
        Self {
            raw_filename: raw_filename.into(),
            version,
            variant,
            scheme,
        }
    }

    /// Return the filename as listed in the remote catalog.
    #[must_use]
    pub fn raw_filename(&self) -> &str {
        &self.raw_filename
    }

    /// Return the version token.
    #[must_use]
    pub fn version(&self) -> &VersionToken {
        &self.version
    }

    /// Return the build variant.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Return the naming scheme that recognised the filename.
    #[must_use]
    pub fn scheme(&self) -> SchemeId {
        self.scheme
    }

    /// Return the sidecar checksum filename for this identity.
    ///
    /// The same name is used for the remote checksum URL and the local
    /// sidecar file.
    #[must_use]
    pub fn sidecar_filename(&self) -> String {
        match self.scheme {
            SchemeId::Legacy => LEGACY_SIDECAR.to_owned(),
            SchemeId::Templated => format!(
                "{}{}{SIDECAR_EXTENSION}",
                self.version.dot_form(),
                self.variant.sidecar_suffix()
            ),
        }
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (version {}, {})",
            self.raw_filename, self.version, self.variant
        )
    }
}
