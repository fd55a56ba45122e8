//! Blocking HTTP transfers for catalog pages, sidecars, and artifacts.
//!
//! Provides a trait-based abstraction over a single `GET` so the sync engine
//! can be exercised without network access. The production implementation
//! wraps one `ureq` agent per run, which keeps connections alive across every
//! request the run issues.

use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors arising from a transfer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// The connection failed or the body could not be read.
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// The URL that was requested.
        url: String,
        /// The configured timeout in seconds.
        timeout_secs: u64,
    },

    /// Every attempt of a retried operation failed.
    #[error("{operation} failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        /// Description of the retried operation.
        operation: String,
        /// Number of attempts made.
        attempts: u32,
        /// The failure of the final attempt.
        last: Box<NetworkError>,
    },
}

/// A single blocking `GET`.
///
/// Abstractions allow tests to script HTTP behaviour without network access.
#[cfg_attr(test, mockall::automock)]
pub trait TransferClient {
    /// Fetch `url` and return the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] on connection failure, timeout, or a
    /// non-success status.
    fn get(&self, url: &str) -> Result<Vec<u8>, NetworkError>;
}

/// HTTP client backed by a `ureq` agent.
#[derive(Debug)]
pub struct HttpClient {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client whose requests, body included, time out after
    /// `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
        }
    }

    /// Return the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl TransferClient for HttpClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e, self.timeout))?;
        let mut body = response.into_body();
        body.with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| map_ureq_error(url, &e, self.timeout))
    }
}

/// Map a ureq error to a [`NetworkError`].
fn map_ureq_error(url: &str, err: &ureq::Error, timeout: Duration) -> NetworkError {
    match err {
        ureq::Error::StatusCode(status) => NetworkError::Status {
            url: url.to_owned(),
            status: *status,
        },
        ureq::Error::Timeout(_) => NetworkError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        },
        other => NetworkError::Transport {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
