//! Shared test utilities for the mirror crate.

use crate::transfer::{NetworkError, TransferClient};
use md5::{Digest, Md5};
use std::cell::RefCell;
use std::collections::HashMap;

/// Computes the lowercase MD5 hex digest of `bytes`.
#[must_use]
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

#[derive(Debug, Clone)]
struct Route {
    response: Result<Vec<u8>, u16>,
    pending_failures: u32,
    pending_status: u16,
}

/// An in-memory [`TransferClient`] serving canned responses per URL.
///
/// URLs without a registered response answer with HTTP 404. Every request
/// is recorded in order.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: RefCell<HashMap<String, Route>>,
    requests: RefCell<Vec<String>>,
}

impl StubTransport {
    /// Creates a transport with no registered URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for every request to `url`.
    pub fn serve(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.set_response(url, Ok(body.into()));
    }

    /// Answers every request to `url` with HTTP `status`.
    pub fn fail_with_status(&self, url: &str, status: u16) {
        self.set_response(url, Err(status));
    }

    /// Answers the next `times` requests to `url` with HTTP `status` before
    /// falling back to the registered response.
    pub fn fail_times(&self, url: &str, times: u32, status: u16) {
        let mut routes = self.routes.borrow_mut();
        let route = routes.entry(url.to_owned()).or_insert_with(|| Route {
            response: Err(404),
            pending_failures: 0,
            pending_status: status,
        });
        route.pending_failures = times;
        route.pending_status = status;
    }

    /// Returns every requested URL in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Returns how many times `url` was requested.
    #[must_use]
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == url).count()
    }

    fn set_response(&self, url: &str, response: Result<Vec<u8>, u16>) {
        let mut routes = self.routes.borrow_mut();
        match routes.get_mut(url) {
            Some(route) => route.response = response,
            None => {
                routes.insert(
                    url.to_owned(),
                    Route {
                        response,
                        pending_failures: 0,
                        pending_status: 0,
                    },
                );
            }
        }
    }
}

impl TransferClient for StubTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        self.requests.borrow_mut().push(url.to_owned());

        let status_error = |status| NetworkError::Status {
            url: url.to_owned(),
            status,
        };
        let mut routes = self.routes.borrow_mut();
        let Some(route) = routes.get_mut(url) else {
            return Err(status_error(404));
        };
        if route.pending_failures > 0 {
            route.pending_failures -= 1;
            return Err(status_error(route.pending_status));
        }
        route.response.clone().map_err(status_error)
    }
}
