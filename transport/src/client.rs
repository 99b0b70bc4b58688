//! reqwest implementation of `HttpTransport`

use async_trait::async_trait;
use qload_core::{HttpResponse, HttpTransport, Target, TransportError};
use reqwest::header::CONNECTION;
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::error::Result;

/// User agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("qload/", env!("CARGO_PKG_VERSION"));

/// HTTP/1.1 client issuing one `GET /` per call
///
/// Idle pooling is disabled and every request asks the server to close the
/// connection, so nothing is reused between calls. The response body is never
/// read; dropping the response releases the connection.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the default user agent
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a transport with a custom user agent
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .http1_only()
            .redirect(Policy::none())
            .pool_max_idle_per_host(0)
            .user_agent(user_agent)
            .build()?;

        tracing::debug!(user_agent, "HTTP client built");
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn get(&self, target: &Target) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(target.url())
            .header(CONNECTION, "close")
            .send()
            .await
            .map_err(classify)?;

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        Ok(HttpResponse {
            status: response.status().as_u16(),
            headers,
        })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let message = err.to_string();
    if err.is_connect() {
        TransportError::Connect(message)
    } else if err.is_timeout() {
        TransportError::Timeout(message)
    } else if err.is_request() || err.is_body() || err.is_decode() {
        TransportError::Protocol(message)
    } else {
        TransportError::Other(message)
    }
}
