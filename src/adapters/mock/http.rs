//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that returns queued responses or
//! errors per URL and records every request.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL, including any query string
    pub url: String,
    /// Request headers
    pub headers: Headers,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
    /// Never complete; exercises caller-side timeouts
    Hang,
}

impl MockResponse {
    /// Shorthand for a response with a JSON/text body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        MockResponse::Success(Response::new(status, body.into()))
    }
}

/// Mock HTTP client for testing.
///
/// Responses are queued per URL. Each request pops the front of the queue for
/// the first matching URL (exact match, then prefix match); the last queued
/// response is sticky and answers every later request.
///
/// # Example
///
/// ```ignore
/// use codefetch::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.push_response("https://api.github.com/repos", MockResponse::status(500, "down"));
/// client.push_response("https://api.github.com/repos", MockResponse::status(200, body));
///
/// // first call sees 500, every later call sees 200
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Queued responses by URL pattern
    responses: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue for a URL with a single sticky response.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        responses.insert(url.to_string(), VecDeque::from([response]));
    }

    /// Append a response to the queue for a URL.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        responses
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub fn request_count(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }

    fn record_request(&self, url: &str, headers: &Headers) {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
        });
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);

        let key = if responses.contains_key(url) {
            url.to_string()
        } else {
            responses
                .keys()
                .filter(|pattern| url.starts_with(pattern.as_str()))
                .max_by_key(|pattern| pattern.len())
                .cloned()?
        };

        let queue = responses.get_mut(&key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(url, headers);

        match self.next_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Hang) => std::future::pending().await,
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_with_response() {
        let client = MockHttpClient::new();
        client.set_response("https://example.com/test", MockResponse::status(200, "Hello"));

        let response = client
            .get("https://example.com/test", &Headers::new())
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.text_lossy(), "Hello");

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.com/test");
    }

    #[tokio::test]
    async fn test_queue_then_sticky() {
        let client = MockHttpClient::new();
        client.push_response("https://example.com", MockResponse::status(500, "first"));
        client.push_response("https://example.com", MockResponse::status(200, "second"));

        let first = client.get("https://example.com", &Headers::new()).await.unwrap();
        let second = client.get("https://example.com", &Headers::new()).await.unwrap();
        let third = client.get("https://example.com", &Headers::new()).await.unwrap();

        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
    }

    #[tokio::test]
    async fn test_prefix_match_prefers_longest() {
        let client = MockHttpClient::new();
        client.set_response("https://example.com/api", MockResponse::status(200, "short"));
        client.set_response("https://example.com/api/v5", MockResponse::status(201, "long"));

        let response = client
            .get("https://example.com/api/v5/repos?access_token=t", &Headers::new())
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(client.request_count("https://example.com/api"), 1);
    }

    #[tokio::test]
    async fn test_error_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com",
            MockResponse::Error(HttpError::ConnectionFailed("refused".into())),
        );

        let result = client.get("https://example.com", &Headers::new()).await;
        assert_eq!(result.unwrap_err(), HttpError::ConnectionFailed("refused".into()));
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.get("https://example.com/missing", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_headers_recorded() {
        let client = MockHttpClient::new();
        client.set_response("https://example.com/auth", MockResponse::status(200, ""));

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "token abc".to_string());
        client.get("https://example.com/auth", &headers).await.unwrap();

        let requests = client.get_requests();
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"token abc".to_string())
        );
    }
}
