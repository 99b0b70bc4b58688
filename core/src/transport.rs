//! HTTP transport trait
//!
//! The trait is defined in core so the worker loop can be tested against
//! mocks; the network-backed implementation lives in `qload-transport`.

use async_trait::async_trait;

use crate::source::Target;

/// Issues a single `GET /` against a target
///
/// Implementations must release the connection before returning, on both the
/// success and the error path, and must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Short identifier used in logs (e.g. "reqwest")
    fn name(&self) -> &str;

    /// Send one request and return the response head
    async fn get(&self, target: &Target) -> Result<HttpResponse, TransportError>;
}

/// Status line and headers of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in wire order
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// Response with a status and no headers
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Attach a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Failure to obtain any response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Could not connect (refused, unreachable, DNS failure)
    #[error("connect error: {0}")]
    Connect(String),

    /// The transport's own timeout elapsed
    #[error("timed out: {0}")]
    Timeout(String),

    /// The peer sent something that is not a valid HTTP response
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Anything else
    #[error("transport error: {0}")]
    Other(String),
}
