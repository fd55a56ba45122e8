//! Mirror configuration.
//!
//! Settings are read from an optional TOML file and then overridden from the
//! command line. Every key has a default, so an empty file (or no file at
//! all) yields a working configuration that mirrors the public catalog into
//! `./resource_pack`.

use crate::artefact::DEFAULT_ARTIFACT_PREFIX;
use crate::retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Catalog served by the upstream mirror host.
pub const DEFAULT_BASE_URL: &str = "http://8.137.167.65:64684/";

/// Directory artifacts are written to, relative to the working directory.
pub const DEFAULT_TARGET_DIR: &str = "resource_pack";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// The offending key.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Settings for one mirror run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    /// Catalog root. Sidecars and relative artifact links resolve against it.
    pub base_url: String,
    /// Local mirror directory.
    pub target_dir: Utf8PathBuf,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Attempts per network operation, at least one.
    pub max_retries: u32,
    /// Filename prefix shared by every artifact in the catalog.
    pub artifact_prefix: String,
    /// Base delay of the exponential backoff between attempts, in
    /// milliseconds. Zero retries immediately.
    pub retry_backoff_ms: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            target_dir: Utf8PathBuf::from(DEFAULT_TARGET_DIR),
            request_timeout_secs: crate::transfer::DEFAULT_TIMEOUT.as_secs(),
            max_retries: DEFAULT_MAX_ATTEMPTS,
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_owned(),
            retry_backoff_ms: 0,
        }
    }
}

impl MirrorConfig {
    /// Parse configuration from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, unknown keys, or
    /// mistyped values.
    ///
    /// # Examples
    ///
    /// ```
    /// use modpack_mirror::config::MirrorConfig;
    ///
    /// let config = MirrorConfig::from_toml_str("max_retries = 4\n").expect("valid TOML");
    /// assert_eq!(config.max_retries, 4);
    /// assert_eq!(config.target_dir, "resource_pack");
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check value ranges and normalise `base_url` to end with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first rejected key.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "base_url",
                reason: format!("\"{base_url}\" is not an http:// or https:// URL"),
            });
        }
        let mut base_url = base_url.to_owned();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;

        if self.max_retries == 0 {
            return Err(ConfigError::Invalid {
                field: "max_retries",
                reason: "at least one attempt is required".to_owned(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "timeout must be greater than zero".to_owned(),
            });
        }
        if self.artifact_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "artifact_prefix",
                reason: "prefix must not be empty".to_owned(),
            });
        }
        Ok(self)
    }

    /// Return the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Return the retry policy applied to every network operation.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries).with_backoff(Duration::from_millis(self.retry_backoff_ms))
    }
}
