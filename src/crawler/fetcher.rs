//! HTTP fetcher implementation
//!
//! This module is the fetch primitive for the whole pipeline:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests with a per-request timeout
//! - Error classification (network failure vs. HTTP status)
//!
//! Nothing here retries; callers decide what a failure means.

use crate::FetchError;
use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Timeout for archive listing pages
pub const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for individual post pages
pub const POST_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for image downloads
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// A successful response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub body: Bytes,
}

impl FetchResponse {
    /// Returns the Content-Type header value, if present
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use substack_dl::crawler::build_http_client;
///
/// let client = build_http_client("substack-dl/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetch primitive shared by the archive walker, the post loop and the
/// asset localizer
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher around a fresh client with the given user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent)?))
    }

    /// Fetches a URL
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(FetchResponse)` |
    /// | Any other status | `FetchError::Status` |
    /// | Timeout, connection refused, TLS, body read failure | `FetchError::Network` |
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchResponse {
            final_url,
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

/// Returns a short description of a network error for log lines
pub fn describe_network_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection refused".to_string()
    } else {
        error.to_string()
    }
}

/// Returns true if the status marks the end of a paginated listing
pub fn is_end_of_listing(status: u16) -> bool {
    status == StatusCode::NOT_FOUND.as_u16()
}
