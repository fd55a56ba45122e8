//! End-to-end mirror run.
//!
//! Fetches the catalog listing, hands its entries to the sync engine, and
//! reports the closing summary.

use crate::catalog::{ListingScanner, fetch_catalog};
use crate::config::MirrorConfig;
use crate::engine::{RunStatistics, SyncEngine};
use crate::error::{MirrorError, Result};
use crate::output::{Reporter, Severity, summary_line};
use crate::transfer::TransferClient;

/// Mirror the catalog described by `config` through `client`.
///
/// Per-artifact failures are reported and counted but do not stop the run;
/// inspect the returned statistics, or pass them to [`require_success`].
///
/// # Errors
///
/// Returns [`MirrorError::Catalog`] when the listing cannot be fetched and
/// [`MirrorError::TargetDirectory`] when the target directory cannot be
/// created.
pub fn run_mirror(
    config: &MirrorConfig,
    client: &dyn TransferClient,
    reporter: &mut Reporter<'_>,
) -> Result<RunStatistics> {
    let scanner = ListingScanner::new(&config.artifact_prefix)?;
    let retry = config.retry_policy();

    reporter.report(
        Severity::Info,
        format_args!("Fetching catalog from {}", config.base_url),
    );
    let entries = fetch_catalog(client, &retry, &config.base_url, &scanner)?;
    reporter.report(
        Severity::Info,
        format_args!(
            "Found {} artifact(s); mirroring into {}",
            entries.len(),
            config.target_dir
        ),
    );

    let engine = SyncEngine::new(config, client);
    let stats = engine.run(&entries, reporter)?;

    let severity = if stats.all_succeeded() {
        Severity::Success
    } else {
        Severity::Info
    };
    reporter.report(severity, summary_line(&stats));
    Ok(stats)
}

/// Turn a run with failed artifacts into an error.
///
/// # Errors
///
/// Returns [`MirrorError::ArtifactsFailed`] when any artifact failed.
pub fn require_success(stats: RunStatistics) -> Result<RunStatistics> {
    if stats.all_succeeded() {
        Ok(stats)
    } else {
        Err(MirrorError::ArtifactsFailed {
            failed: stats.failed(),
            total: stats.total(),
        })
    }
}
