//! One authenticated read of the code file from one provider.
//!
//! The fetcher performs exactly one GET, bounded by [`FETCH_TIMEOUT`], and
//! turns the contents-API envelope into a [`VerifyCode`]. It never retries and
//! holds no state; the orchestrator owns both concerns.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::decoder;
use crate::error::{CodeError, CodeResult};
use crate::models::{ProviderConfig, VerifyCode};
use crate::provider::{build_request, ProviderProfile};
use crate::traits::{HttpClient, HttpError};

/// Per-request upper bound for provider reads.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response body kept in a `Remote` error.
const MAX_ERROR_BODY: usize = 512;

/// The subset of the contents-API response we read.
#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

/// Reads verification codes through an injected [`HttpClient`].
#[derive(Clone)]
pub struct ContentFetcher {
    http: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl ContentFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Tighten the per-call bound. Values above [`FETCH_TIMEOUT`] are capped.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.min(FETCH_TIMEOUT);
        self
    }

    /// Fetch and decode the code file for `provider`.
    pub async fn fetch(&self, provider: &ProviderConfig) -> CodeResult<VerifyCode> {
        let request = build_request(provider);

        let call = self.http.get(&request.url, &request.headers);
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                CodeError::Network(format!("request timed out after {}s", self.timeout.as_secs()))
            })?
            .map_err(network_error)?;

        tracing::trace!(
            provider = %provider.kind,
            status = response.status,
            body = %response.text_lossy(),
            "Raw provider response"
        );

        if !response.is_success() {
            let mut body = response.text_lossy();
            truncate_on_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(CodeError::Remote {
                status: response.status,
                body,
            });
        }

        let envelope: ContentEnvelope = response
            .json()
            .map_err(|e| CodeError::Decode(format!("response envelope: {}", e)))?;

        check_encoding(provider, envelope.encoding.as_deref())?;

        let bytes = decoder::decode_base64_content(&envelope.content)?;
        decoder::decode(&bytes)
    }
}

/// Only base64 is accepted. An absent or empty tag is base64 only for
/// providers whose API omits it.
fn check_encoding(provider: &ProviderConfig, encoding: Option<&str>) -> CodeResult<()> {
    let profile = ProviderProfile::for_kind(provider.kind);
    match encoding.unwrap_or("") {
        "base64" => Ok(()),
        "" if profile.empty_encoding_is_base64 => Ok(()),
        other => Err(CodeError::Encoding(other.to_string())),
    }
}

fn network_error(err: HttpError) -> CodeError {
    CodeError::Network(err.to_string())
}

fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}
