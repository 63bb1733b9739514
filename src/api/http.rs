//! Time-bounded HTTP transport.
//!
//! Every request carries an explicit deadline; hitting it aborts the
//! request and surfaces as [`ClientError::Timeout`]. There are no retries.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::payload::FormPayload;
use crate::error::{ClientError, Result};

const USER_AGENT: &str = "filecombine/0.4 (github.com/monokrome/filecombine)";

/// Raw response: status plus body bytes. Status interpretation is left to
/// the caller so cache policies can store non-2xx bodies where the browser
/// would.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body bytes of a successful response, or the server-error variant.
    pub fn success_body(self) -> Result<Vec<u8>> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ClientError::Server {
                status: self.status,
            })
        }
    }
}

/// Transport seam: the typed API client and the asset cache both speak to
/// the network through this trait, and tests substitute a recording mock.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a multipart form, aborting after `timeout`.
    async fn post_form(
        &self,
        url: &str,
        payload: FormPayload,
        timeout: Duration,
    ) -> Result<RawResponse>;

    /// Plain GET, aborting after `timeout`.
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse>;
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        url: &str,
        payload: FormPayload,
        timeout: Duration,
    ) -> Result<RawResponse> {
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .multipart(payload.into_form()?)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::from_reqwest(e, timeout))?
            .to_vec();

        debug!(
            url,
            status,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "POST complete"
        );
        Ok(RawResponse { status, body })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::from_reqwest(e, timeout))?
            .to_vec();

        debug!(url, status, bytes = body.len(), "GET complete");
        Ok(RawResponse { status, body })
    }
}
