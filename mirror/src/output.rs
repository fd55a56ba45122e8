//! User-facing reporting.
//!
//! Every reported line is also sent to the `log` facade at the matching
//! level, so an embedding application that installs a logger sees the same
//! events as the terminal user.

use crate::config::MirrorConfig;
use crate::engine::RunStatistics;
use std::fmt;
use std::io::Write;

/// Severity of a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An artifact or the run failed.
    Error,
    /// An artifact was downloaded and verified, or the run completed cleanly.
    Success,
    /// Progress information.
    Info,
    /// Diagnostic detail, never written to the terminal.
    Debug,
}

impl Severity {
    /// Return the label printed before the message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Return the `log` level this severity is forwarded at.
    #[must_use]
    pub const fn log_level(self) -> log::Level {
        match self {
            Self::Error => log::Level::Error,
            Self::Success | Self::Info => log::Level::Info,
            Self::Debug => log::Level::Debug,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Writes one line to the provided writer, ignoring I/O errors.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Writes labelled progress lines to a terminal stream.
pub struct Reporter<'w> {
    out: &'w mut dyn Write,
    quiet: bool,
}

impl<'w> Reporter<'w> {
    /// Create a reporter writing to `out`.
    ///
    /// In quiet mode only [`Severity::Error`] lines reach `out`.
    pub fn new(out: &'w mut dyn Write, quiet: bool) -> Self {
        Self { out, quiet }
    }

    /// Report `message` at `severity`.
    pub fn report(&mut self, severity: Severity, message: impl fmt::Display) {
        log::log!(severity.log_level(), "{message}");
        if self.should_print(severity) {
            write_stderr_line(self.out, format_args!("[{severity}] {message}"));
        }
    }

    fn should_print(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => true,
            Severity::Success | Severity::Info => !self.quiet,
            Severity::Debug => false,
        }
    }
}

impl fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

/// Format the closing summary of a run.
///
/// # Example
///
/// ```
/// use modpack_mirror::engine::{RunStatistics, SyncOutcome};
/// use modpack_mirror::output::summary_line;
///
/// let mut stats = RunStatistics::default();
/// stats.record(SyncOutcome::Downloaded);
/// stats.record(SyncOutcome::Skipped);
/// assert_eq!(
///     summary_line(&stats),
///     "Processed 2 artifact(s): 1 downloaded, 1 skipped, 0 failed"
/// );
/// ```
#[must_use]
pub fn summary_line(stats: &RunStatistics) -> String {
    format!(
        "Processed {} artifact(s): {} downloaded, {} skipped, {} failed",
        stats.total(),
        stats.downloaded(),
        stats.skipped(),
        stats.failed()
    )
}

/// Configuration information for dry-run output.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The effective configuration.
    pub config: &'a MirrorConfig,
    /// The configuration file, if one was given.
    pub config_file: Option<&'a camino::Utf8Path>,
    /// Whether quiet mode is enabled.
    pub quiet: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let config = self.config;
        let config_file = self
            .config_file
            .map_or_else(|| "(none)".to_owned(), ToString::to_string);
        [
            "Dry run - no requests will be made and no files will be written".to_owned(),
            String::new(),
            format!("Configuration file: {config_file}"),
            format!("Catalog URL: {}", config.base_url),
            format!("Target directory: {}", config.target_dir),
            format!("Artifact prefix: {}", config.artifact_prefix),
            format!("Request timeout: {}s", config.request_timeout_secs),
            format!("Attempts per request: {}", config.max_retries),
            format!("Retry backoff: {}ms", config.retry_backoff_ms),
            format!("Quiet: {}", self.quiet),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SyncOutcome;
    use rstest::rstest;

    fn render(quiet: bool, lines: &[(Severity, &str)]) -> String {
        let mut buffer = Vec::new();
        let mut reporter = Reporter::new(&mut buffer, quiet);
        for (severity, message) in lines {
            reporter.report(*severity, message);
        }
        String::from_utf8(buffer).expect("UTF-8 output")
    }

    #[rstest]
    #[case::error(Severity::Error, log::Level::Error)]
    #[case::success(Severity::Success, log::Level::Info)]
    #[case::info(Severity::Info, log::Level::Info)]
    #[case::debug(Severity::Debug, log::Level::Debug)]
    fn severities_map_to_log_levels(#[case] severity: Severity, #[case] level: log::Level) {
        assert_eq!(severity.log_level(), level);
    }

    #[test]
    fn reporter_labels_lines() {
        let output = render(false, &[(Severity::Success, "downloaded Modpack-1-20.zip")]);
        assert_eq!(output, "[SUCCESS] downloaded Modpack-1-20.zip\n");
    }

    #[test]
    fn debug_lines_are_never_printed() {
        let output = render(false, &[(Severity::Debug, "hashing")]);
        assert!(output.is_empty());
    }

    #[test]
    fn quiet_mode_keeps_only_errors() {
        let output = render(
            true,
            &[
                (Severity::Info, "skipped"),
                (Severity::Success, "downloaded"),
                (Severity::Error, "failed"),
            ],
        );
        assert_eq!(output, "[ERROR] failed\n");
    }

    #[test]
    fn summary_counts_every_outcome() {
        let mut stats = RunStatistics::default();
        stats.record(SyncOutcome::Downloaded);
        stats.record(SyncOutcome::Failed);
        stats.record(SyncOutcome::Failed);
        assert_eq!(
            summary_line(&stats),
            "Processed 3 artifact(s): 1 downloaded, 0 skipped, 2 failed"
        );
    }

    #[test]
    fn dry_run_lists_effective_settings() {
        let config = MirrorConfig::default();
        let info = DryRunInfo {
            config: &config,
            config_file: None,
            quiet: false,
        };
        let text = info.display_text();
        assert!(text.starts_with("Dry run"));
        assert!(text.contains("Configuration file: (none)"));
        assert!(text.contains("Catalog URL: http://8.137.167.65:64684/"));
        assert!(text.contains("Target directory: resource_pack"));
        assert!(text.contains("Attempts per request: 2"));
    }
}
