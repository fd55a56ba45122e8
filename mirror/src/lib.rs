//! Incremental, checksum-driven mirror for versioned modpack archives.
//!
//! The crate scans a remote catalog listing, resolves each archive filename
//! into a typed identity, and fetches only the archives whose published MD5
//! sidecar differs from the local copy. Every download is verified before its
//! sidecar is written, so a sidecar on disk always describes the archive next
//! to it. It is used by the `modpack-mirror` CLI binary and can be driven
//! programmatically with any [`transfer::TransferClient`].
//!
//! # Modules
//!
//! - [`artefact`] - Filename resolution, version tokens, and digest validation
//! - [`catalog`] - Listing page scanner
//! - [`checksum`] - Local digest computation and remote sidecar lookup
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - TOML configuration with defaults and validation
//! - [`engine`] - Per-artifact synchronisation state machine and run statistics
//! - [`error`] - Per-artifact and run-level error types
//! - [`output`] - Severity-labelled reporting and summaries
//! - [`persistence`] - Atomic artifact writes and sidecar files
//! - [`pipeline`] - End-to-end mirror run
//! - [`retry`] - Bounded retry with optional exponential backoff
//! - [`transfer`] - Blocking HTTP client abstraction

pub mod artefact;
pub mod catalog;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod persistence;
pub mod pipeline;
pub mod retry;
pub mod transfer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
