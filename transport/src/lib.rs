//! qload-transport: reqwest-backed HTTP transport for qload
//!
//! Provides [`ReqwestTransport`], the network implementation of
//! [`qload_core::HttpTransport`]. Requests are plain HTTP/1.1 `GET /` with no
//! TLS, no redirects, no retries and no connection reuse.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
pub mod error;

pub use client::{ReqwestTransport, DEFAULT_USER_AGENT};
pub use error::{Error, Result};
