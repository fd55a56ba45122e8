//! Incremental synchronisation engine.
//!
//! Each catalog entry is driven through a small state machine:
//!
//! ```text
//! Start -> IdentityResolved -> RemoteDigestKnown -+-> Skip ---------------------------> Done
//!                                                 +-> NeedTransfer -> Transferred -> Verified -> Done
//! ```
//!
//! Any step may instead move to the absorbing `Failed` state. Entries are
//! processed one at a time and never affect each other; a failure is counted
//! and the run moves on.

use crate::artefact::{ArtifactIdentity, Md5Digest, Resolver};
use crate::catalog::CatalogEntry;
use crate::checksum::{ChecksumOracle, compute_md5, local_digest};
use crate::config::MirrorConfig;
use crate::error::SyncError;
use crate::output::{Reporter, Severity};
use crate::persistence::{ArtifactStore, FileError};
use crate::retry::RetryPolicy;
use crate::transfer::TransferClient;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

/// Position of one artifact in the synchronisation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    /// Nothing has been done yet.
    Start,
    /// The filename resolved to an identity.
    IdentityResolved,
    /// The published digest was fetched and validated.
    RemoteDigestKnown,
    /// The local copy already matches the published digest.
    Skip,
    /// The local copy is missing or stale.
    NeedTransfer,
    /// Fresh bytes were written to the local path.
    Transferred,
    /// The written bytes hash to the published digest.
    Verified,
    /// The sidecar was written; the artifact is current.
    Done,
    /// Processing stopped with an error.
    Failed,
}

impl SyncState {
    /// Return whether the machine may move from `self` to `next`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::IdentityResolved)
                | (Self::IdentityResolved, Self::RemoteDigestKnown)
                | (Self::RemoteDigestKnown, Self::Skip | Self::NeedTransfer)
                | (Self::Skip | Self::Verified, Self::Done)
                | (Self::NeedTransfer, Self::Transferred)
                | (Self::Transferred, Self::Verified)
        ) || (matches!(next, Self::Failed) && !self.is_terminal())
    }

    /// Return whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Final result for one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncOutcome {
    /// Fresh bytes were fetched and verified.
    Downloaded,
    /// The local copy was already current.
    Skipped,
    /// Processing failed; see the record's error.
    Failed,
}

/// Per-artifact working state.
#[derive(Debug)]
pub struct SyncRecord {
    /// Filename as listed in the catalog.
    pub filename: String,
    /// Where the artifact lives locally.
    pub local_path: Utf8PathBuf,
    /// Where the artifact is fetched from.
    pub remote_url: String,
    /// Resolved identity, once known.
    pub identity: Option<ArtifactIdentity>,
    /// Published digest, once fetched.
    pub remote_digest: Option<Md5Digest>,
    /// Digest of the local file, when one exists.
    pub local_digest: Option<Md5Digest>,
    state: SyncState,
    transitions: Vec<SyncState>,
    error: Option<SyncError>,
}

impl SyncRecord {
    /// Create a record in the [`SyncState::Start`] state.
    #[must_use]
    pub fn new(filename: &str, local_path: Utf8PathBuf, remote_url: String) -> Self {
        Self {
            filename: filename.to_owned(),
            local_path,
            remote_url,
            identity: None,
            remote_digest: None,
            local_digest: None,
            state: SyncState::Start,
            transitions: vec![SyncState::Start],
            error: None,
        }
    }

    /// Return the current state.
    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Return every state visited, starting with [`SyncState::Start`].
    #[must_use]
    pub fn transitions(&self) -> &[SyncState] {
        &self.transitions
    }

    /// Return the failure that stopped processing, if any.
    #[must_use]
    pub fn error(&self) -> Option<&SyncError> {
        self.error.as_ref()
    }

    /// Return the outcome once the record is terminal.
    #[must_use]
    pub fn outcome(&self) -> Option<SyncOutcome> {
        match self.state {
            SyncState::Failed => Some(SyncOutcome::Failed),
            SyncState::Done if self.transitions.contains(&SyncState::Skip) => {
                Some(SyncOutcome::Skipped)
            }
            SyncState::Done => Some(SyncOutcome::Downloaded),
            _ => None,
        }
    }

    fn advance(&mut self, next: SyncState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {next:?}",
            self.state
        );
        debug!("{}: {:?} -> {next:?}", self.filename, self.state);
        self.state = next;
        self.transitions.push(next);
    }

    fn fail(&mut self, error: SyncError) {
        self.advance(SyncState::Failed);
        self.error = Some(error);
    }
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    total: u64,
    downloaded: u64,
    skipped: u64,
    failed: u64,
}

impl RunStatistics {
    /// Count one terminal outcome.
    pub fn record(&mut self, outcome: SyncOutcome) {
        self.total = self.total.saturating_add(1);
        let counter = match outcome {
            SyncOutcome::Downloaded => &mut self.downloaded,
            SyncOutcome::Skipped => &mut self.skipped,
            SyncOutcome::Failed => &mut self.failed,
        };
        *counter = counter.saturating_add(1);
    }

    /// Return the number of entries processed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Return the number of artifacts fetched and verified.
    #[must_use]
    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    /// Return the number of artifacts that were already current.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Return the number of artifacts that failed.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Return whether every processed artifact is now current.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Drives catalog entries through the synchronisation state machine.
pub struct SyncEngine<'a> {
    config: &'a MirrorConfig,
    client: &'a dyn TransferClient,
    resolver: Resolver,
    store: ArtifactStore,
    retry: RetryPolicy,
}

impl<'a> SyncEngine<'a> {
    /// Create an engine for `config` that transfers through `client`.
    ///
    /// `config` is expected to have passed [`MirrorConfig::validate`].
    #[must_use]
    pub fn new(config: &'a MirrorConfig, client: &'a dyn TransferClient) -> Self {
        Self {
            config,
            client,
            resolver: Resolver::new(&config.artifact_prefix),
            store: ArtifactStore::new(config.target_dir.clone()),
            retry: config.retry_policy(),
        }
    }

    /// Create the target directory.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::CreateDirectory`] when the directory cannot be
    /// created.
    pub fn prepare(&self) -> Result<(), FileError> {
        self.store.prepare()
    }

    /// Synchronise every entry in order and report each outcome.
    ///
    /// # Errors
    ///
    /// Returns [`FileError`] only when the target directory cannot be
    /// created; per-artifact failures are counted instead.
    pub fn run(
        &self,
        entries: &[CatalogEntry],
        reporter: &mut Reporter<'_>,
    ) -> Result<RunStatistics, FileError> {
        self.prepare()?;

        let mut stats = RunStatistics::default();
        for entry in entries {
            let record = self.sync_entry(entry);
            report_record(reporter, &record);
            stats.record(record.outcome().unwrap_or(SyncOutcome::Failed));
        }
        Ok(stats)
    }

    /// Drive one entry to a terminal state.
    #[must_use]
    pub fn sync_entry(&self, entry: &CatalogEntry) -> SyncRecord {
        let mut record = SyncRecord::new(
            &entry.filename,
            self.store.artifact_path(&entry.filename),
            self.artifact_url(&entry.href),
        );
        if let Err(err) = self.drive(&mut record) {
            record.fail(err);
        }
        record
    }

    /// Return the download URL for a catalog link.
    ///
    /// Absolute `http://` and `https://` links are used as-is; anything else
    /// is resolved against the base URL.
    #[must_use]
    pub fn artifact_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_owned()
        } else {
            format!("{}{}", self.config.base_url, href.trim_start_matches('/'))
        }
    }

    fn drive(&self, record: &mut SyncRecord) -> Result<(), SyncError> {
        let identity = self.resolver.resolve(&record.filename)?;
        record.identity = Some(identity.clone());
        record.advance(SyncState::IdentityResolved);

        let oracle = ChecksumOracle::new(self.client, self.retry, &self.config.base_url);
        let remote = oracle.remote_digest(&identity)?;
        record.remote_digest = Some(remote.clone());
        record.advance(SyncState::RemoteDigestKnown);

        let sidecar_path = self.store.sidecar_path(&identity);
        record.local_digest = local_digest(&record.local_path);
        if record.local_digest.as_ref() == Some(&remote) {
            record.advance(SyncState::Skip);
            self.store.write_sidecar(&sidecar_path, &remote)?;
            record.advance(SyncState::Done);
            return Ok(());
        }
        record.advance(SyncState::NeedTransfer);

        let url = record.remote_url.clone();
        let operation = format!("download {}", record.filename);
        let body = self.retry.run(&operation, || self.client.get(&url))?;
        self.store.write_artifact(&record.local_path, &body)?;
        record.advance(SyncState::Transferred);

        let actual = self.verify(&record.filename, &record.local_path, &remote)?;
        record.local_digest = Some(actual);
        record.advance(SyncState::Verified);

        self.store.write_sidecar(&sidecar_path, &remote)?;
        record.advance(SyncState::Done);
        Ok(())
    }

    /// Hash the written artifact and remove it unless it matches `expected`.
    fn verify(
        &self,
        filename: &str,
        path: &Utf8Path,
        expected: &Md5Digest,
    ) -> Result<Md5Digest, SyncError> {
        let verdict = match compute_md5(path) {
            Ok(actual) if actual == *expected => return Ok(actual),
            Ok(actual) => SyncError::ChecksumMismatch {
                filename: filename.to_owned(),
                expected: expected.clone(),
                actual,
            },
            Err(source) => SyncError::File(FileError::Read {
                path: path.to_owned(),
                source,
            }),
        };

        if let Err(err) = self.store.discard(path) {
            warn!("could not remove unverified artifact: {err}");
        }
        Err(verdict)
    }
}

fn report_record(reporter: &mut Reporter<'_>, record: &SyncRecord) {
    match (record.outcome(), record.error()) {
        (Some(SyncOutcome::Downloaded), _) => {
            reporter.report(Severity::Success, format_args!("downloaded {}", record.filename));
        }
        (Some(SyncOutcome::Skipped), _) => {
            reporter.report(
                Severity::Info,
                format_args!("skipped {}: already current", record.filename),
            );
        }
        (_, Some(err)) => {
            reporter.report(Severity::Error, format_args!("{}: {err}", record.filename));
        }
        (_, None) => {
            reporter.report(
                Severity::Error,
                format_args!("{}: stopped in state {:?}", record.filename, record.state()),
            );
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
