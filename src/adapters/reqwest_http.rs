//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production HTTP client implementation using reqwest,
//! implementing the [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use std::time::Duration;

use crate::fetcher::FETCH_TIMEOUT;
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use codefetch::adapters::ReqwestHttpClient;
/// use codefetch::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::new()?;
/// let response = client.get("https://api.github.com/zen", &Headers::new()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client whose requests time out after [`FETCH_TIMEOUT`].
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Other(e.to_string()))?;
        Ok(Self { client })
    }

    /// Convert reqwest error to HttpError.
    ///
    /// The URL is dropped from the message: Gitee requests carry the access
    /// token in the query string.
    fn convert_error(err: reqwest::Error) -> HttpError {
        let timeout = err.is_timeout();
        let connect = err.is_connect();
        let builder = err.is_builder();
        let message = err.without_url().to_string();

        if timeout {
            HttpError::Timeout(message)
        } else if connect {
            HttpError::ConnectionFailed(message)
        } else if builder {
            HttpError::InvalidUrl(message)
        } else {
            HttpError::Other(message)
        }
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = self.client.get(url);
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::new(status, body))
    }
}
