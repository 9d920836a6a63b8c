//! HTTP fetcher
//!
//! [`PageFetcher`] is the seam between the engine and the HTTP transport;
//! [`HttpFetcher`] is the reqwest-backed implementation. Fetch failures are
//! classified into the small taxonomy the engine logs per URL: timeout,
//! connection refused, non-success status, other.

use crate::{FetchError, SeineError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Retrieves the raw content of a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with the crawler's user agent
///
/// Per-request timeouts are passed at fetch time; only the connect timeout
/// is fixed here.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed page fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, SeineError> {
        let client = build_http_client(user_agent)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(classify_error)?;
        Ok(body.to_vec())
    }
}

/// Maps a transport error onto the fetch error taxonomy
fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::ConnectionRefused
    } else {
        FetchError::Other(error.to_string())
    }
}
