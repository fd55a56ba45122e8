//! CLI argument definitions for the modpack mirror.
//!
//! Flags override values from the optional configuration file, which in turn
//! override the built-in defaults.

use crate::config::{ConfigError, MirrorConfig};
use camino::Utf8PathBuf;
use clap::Parser;

/// Mirror versioned modpack archives into a local directory.
#[derive(Parser, Debug, Default)]
#[command(name = "modpack-mirror")]
#[command(version, about)]
#[command(long_about = concat!(
    "Mirror versioned modpack archives into a local directory.\n\n",
    "The catalog listing is scanned for archives, and each archive's published ",
    "MD5 sidecar is compared with the local copy. Only missing or changed ",
    "archives are downloaded; every download is verified before its sidecar ",
    "is written.\n\n",
    "Settings are taken from the built-in defaults, then from --config, then ",
    "from the flags below.",
))]
#[command(after_help = concat!(
    "CONFIGURATION FILE KEYS:\n",
    "  base_url               Catalog root URL\n",
    "  target_dir             Local mirror directory\n",
    "  request_timeout_secs   Per-request timeout in seconds\n",
    "  max_retries            Attempts per network operation\n",
    "  artifact_prefix        Filename prefix of catalog archives\n",
    "  retry_backoff_ms       Base delay between attempts in milliseconds\n\n",
    "EXIT STATUS:\n",
    "  0  every archive was downloaded or already current\n",
    "  1  configuration, listing, or directory failure, or any archive failed\n\n",
    "EXAMPLES:\n",
    "  Mirror the default catalog into ./resource_pack:\n",
    "    $ modpack-mirror\n\n",
    "  Mirror into another directory with three attempts per request:\n",
    "    $ modpack-mirror --target-dir /srv/packs --max-retries 3\n\n",
    "  Preview the effective settings:\n",
    "    $ modpack-mirror --config mirror.toml --dry-run",
))]
pub struct Cli {
    /// Read settings from a TOML file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Catalog root URL.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Local mirror directory [default: resource_pack].
    #[arg(short, long, value_name = "DIR")]
    pub target_dir: Option<Utf8PathBuf>,

    /// Per-request timeout in seconds [default: 30].
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Attempts per network operation [default: 2].
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Filename prefix of catalog archives.
    #[arg(long, value_name = "NAME")]
    pub prefix: Option<String>,

    /// Show the effective configuration and exit without network or disk access.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Apply flag values on top of `config`.
    #[must_use]
    pub fn apply_overrides(&self, mut config: MirrorConfig) -> MirrorConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(target_dir) = &self.target_dir {
            config.target_dir.clone_from(target_dir);
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(prefix) = &self.prefix {
            config.artifact_prefix.clone_from(prefix);
        }
        config
    }

    /// Build the validated configuration for this invocation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration file cannot be read or
    /// parsed, or when the merged values fail validation.
    pub fn resolve_config(&self) -> Result<MirrorConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => MirrorConfig::load(path)?,
            None => MirrorConfig::default(),
        };
        self.apply_overrides(base).validate()
    }
}
