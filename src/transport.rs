//! Blocking HTTP seam for the client.
//!
//! The retry loop in [`crate::client`] only needs "one GET, give me status and
//! body". Putting that behind a trait keeps the loop testable without a
//! network: production uses [`UreqTransport`], tests script their own
//! responses.

use thiserror::Error;

/// Connection-level failure: the request never produced an HTTP status.
/// Non-200 statuses are data, not errors; they come back in [`FetchedBody`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ConnectionError {
    pub message: String,
}

/// One transported response: status code plus the full body text.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub status: u16,
    pub body: String,
}

/// A single blocking HTTP GET against a fully-qualified URL.
pub trait Transport {
    fn get(&self, url: &str) -> Result<FetchedBody, ConnectionError>;
}

/// Production transport backed by a shared [`ureq::Agent`].
///
/// The agent is configured with `http_status_as_error(false)` so 202/540/etc.
/// reach the caller's status classifier instead of becoming `ureq::Error`s.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<FetchedBody, ConnectionError> {
        match self.agent.get(url).call() {
            Ok(response) => {
                let status = response.status().as_u16();
                let mut body_reader = response.into_body();
                match body_reader.read_to_string() {
                    Ok(body) => Ok(FetchedBody { status, body }),
                    Err(e) => Err(ConnectionError { message: format!("Failed to read response body: {}", e) }),
                }
            }
            Err(e) => Err(ConnectionError { message: e.to_string() }),
        }
    }
}
