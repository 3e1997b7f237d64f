//! The retrieval/delivery error taxonomy.

use std::fmt;
use thiserror::Error;

use crate::models::ProviderKind;

/// Result alias for retrieval and delivery operations.
pub type CodeResult<T> = Result<T, CodeError>;

/// Errors produced by the retrieval pipeline and the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// Transport failure or timeout
    #[error("network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("remote error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// Content carried an encoding tag other than base64
    #[error("unsupported content encoding: {0:?}")]
    Encoding(String),

    /// Base64 or JSON payload could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Timestamp did not match `YYYY-MM-DD HH:MM:SS`
    #[error("timestamp parse error: {0}")]
    Parse(String),

    /// Every attempt against every enabled provider failed and no stale code was seen
    #[error("no verification code after {attempts} attempt(s){}", FailureList(.failures))]
    Exhausted {
        attempts: u32,
        failures: Vec<ProviderFailure>,
    },

    /// Clipboard write or keystroke injection failed
    #[error("delivery error: {0}")]
    Delivery(String),
}

impl CodeError {
    /// Short stable code used as a structured log field.
    pub fn error_code(&self) -> &'static str {
        match self {
            CodeError::Network(_) => "NETWORK",
            CodeError::Remote { .. } => "REMOTE",
            CodeError::Encoding(_) => "ENCODING",
            CodeError::Decode(_) => "DECODE",
            CodeError::Parse(_) => "PARSE",
            CodeError::Exhausted { .. } => "EXHAUSTED",
            CodeError::Delivery(_) => "DELIVERY",
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Used only for log severity; the orchestrator retries regardless.
    pub fn is_retryable(&self) -> bool {
        match self {
            CodeError::Network(_) => true,
            CodeError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// One provider failure observed during a retrieval round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: ProviderKind,
    /// 0-based round index
    pub attempt: u32,
    pub error: CodeError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (attempt {}): {}", self.provider, self.attempt + 1, self.error)
    }
}

struct FailureList<'a>(&'a [ProviderFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(": no provider enabled");
        }
        f.write_str(": ")?;
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}
