//! Thin HTTP client wrapper
//!
//! Shared by the OAuth client and the accounting API client. Deliberately has
//! no retry logic: every downstream failure aborts the current invocation and
//! is surfaced to the caller.

use std::time::Duration;

use invoicepatch_domain::{InvoicePatchError, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client with a shared timeout and structured request logging.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Create a client with the default 30s timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| InvoicePatchError::Internal(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { client })
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    ///
    /// Transport failures map to `Network`; HTTP error statuses are returned
    /// as ordinary responses for the caller to classify.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder
            .build()
            .map_err(|err| InvoicePatchError::Internal(format!("invalid request: {err}")))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| InvoicePatchError::Network(err.to_string()))?;

        debug!(%method, %url, status = response.status().as_u16(), "received HTTP response");

        Ok(response)
    }
}
