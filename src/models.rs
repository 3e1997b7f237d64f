//! Core data types shared by the retrieval pipeline and the delivery side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::CodeError;

/// The two interchangeable content hosts, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// GitHub contents API (provider A)
    GitHub,
    /// Gitee v5 contents API (provider B)
    Gitee,
}

impl ProviderKind {
    /// Priority order used by the orchestrator.
    pub const PRIORITY: [ProviderKind; 2] = [ProviderKind::GitHub, ProviderKind::Gitee];

    /// Lowercase name used in logs and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::Gitee => "gitee",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the access token travels on the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: token <T>` header
    Header,
    /// `?access_token=<T>` query parameter
    Query,
}

/// Connection details for one provider. Immutable for the duration of a retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub auth_token: String,
    /// `owner/repo`
    pub repository_path: String,
    /// Path of the JSON file inside the repository
    pub file_path: String,
    /// Overrides the provider's default API base URL
    pub api_base: Option<String>,
    /// Overrides the provider's default auth style
    pub auth_style: Option<AuthStyle>,
}

impl ProviderConfig {
    /// Create a provider config with default base URL and auth style.
    pub fn new(
        kind: ProviderKind,
        auth_token: impl Into<String>,
        repository_path: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            auth_token: auth_token.into(),
            repository_path: repository_path.into(),
            file_path: file_path.into(),
            api_base: None,
            auth_style: None,
        }
    }

    /// Point the provider at a different API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Force a specific auth style.
    pub fn with_auth_style(mut self, style: AuthStyle) -> Self {
        self.auth_style = Some(style);
        self
    }

    /// A provider takes part in retrieval only when it has a token.
    pub fn is_enabled(&self) -> bool {
        !self.auth_token.trim().is_empty()
    }
}

/// A decoded verification code record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyCode {
    /// `YYYY-MM-DD HH:MM:SS`, local time
    pub date: String,
    #[serde(rename = "verifyCode")]
    pub code: String,
}

impl VerifyCode {
    pub fn new(date: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            code: code.into(),
        }
    }
}

/// How long to wait between retrieval rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffPolicy {
    /// Sleep `inter_attempt_delay` after every round
    #[default]
    Fixed,
    /// Sleep `inter_attempt_delay * 2^round`
    Exponential,
}

/// Which freshness semantics the deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessPolicy {
    /// Fresh iff `|now - date| <= max_age_window`
    #[default]
    Window,
    /// Fresh iff `now <= date`
    Expiry,
}

/// Upper bound on the exponential backoff multiplier exponent.
const MAX_BACKOFF_SHIFT: u32 = 16;

/// Governs one orchestrator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalPolicy {
    max_attempts: u32,
    pub inter_attempt_delay: Duration,
    pub max_age_window: Duration,
    pub backoff: BackoffPolicy,
    pub freshness: FreshnessPolicy,
}

impl RetrievalPolicy {
    /// Build a policy. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, inter_attempt_delay: Duration, max_age_window: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            inter_attempt_delay,
            max_age_window,
            backoff: BackoffPolicy::Fixed,
            freshness: FreshnessPolicy::Window,
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_freshness(mut self, freshness: FreshnessPolicy) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sleep to apply after round `round` (0-based) before the next one.
    pub fn backoff_delay(&self, round: u32) -> Duration {
        match self.backoff {
            BackoffPolicy::Fixed => self.inter_attempt_delay,
            BackoffPolicy::Exponential => {
                let factor = 1u32 << round.min(MAX_BACKOFF_SHIFT);
                self.inter_attempt_delay.saturating_mul(factor)
            }
        }
    }
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000), Duration::from_secs(300))
    }
}

/// Result of one orchestrator invocation.
#[derive(Debug)]
pub enum RetrievalOutcome {
    /// A code that satisfied the freshness policy
    Fresh(VerifyCode),
    /// Best-effort fallback: decoded, but never fresh across the whole budget
    Stale(VerifyCode),
    /// Nothing usable; always `CodeError::Exhausted`
    Failed(CodeError),
}

impl RetrievalOutcome {
    /// The code to deliver, if any.
    pub fn code(&self) -> Option<&VerifyCode> {
        match self {
            RetrievalOutcome::Fresh(code) | RetrievalOutcome::Stale(code) => Some(code),
            RetrievalOutcome::Failed(_) => None,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, RetrievalOutcome::Fresh(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RetrievalOutcome::Fresh(_) => "fresh",
            RetrievalOutcome::Stale(_) => "stale",
            RetrievalOutcome::Failed(_) => "failed",
        }
    }
}

/// What the dispatcher did with a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    /// All requested effects completed
    Delivered,
    /// Code equals the last delivered one; no effect performed
    Skipped,
    /// At least one effect failed. Completed effects are not rolled back.
    PartialFailure {
        clipboard_ok: bool,
        injection_ok: bool,
        message: String,
    },
}

impl DeliveryResult {
    /// Surface a partial failure as `CodeError::Delivery`.
    pub fn into_result(self) -> Result<DeliveryResult, CodeError> {
        match self {
            DeliveryResult::PartialFailure { message, .. } => Err(CodeError::Delivery(message)),
            other => Ok(other),
        }
    }
}

/// What fired a retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// One-shot fetch at process start
    Startup,
    /// Periodic polling tick
    Timer,
    /// Global hotkey press
    Hotkey,
    /// Explicit user request from the terminal
    Manual,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::Startup => "startup",
            TriggerSource::Timer => "timer",
            TriggerSource::Hotkey => "hotkey",
            TriggerSource::Manual => "manual",
        }
    }

    /// Startup and manual requests only fill the clipboard: at startup nothing is
    /// waiting for input, and a manual request comes from the focused terminal itself.
    pub fn allows_autofill(&self) -> bool {
        matches!(self, TriggerSource::Timer | TriggerSource::Hotkey)
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
