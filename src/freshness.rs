//! Freshness check for decoded codes.
//!
//! Timestamps are `YYYY-MM-DD HH:MM:SS` in the local timezone. Two policies
//! exist and a deployment picks exactly one (see [`FreshnessPolicy`]):
//!
//! - `Window`: fresh iff `|now - date| <= window` (both ends inclusive)
//! - `Expiry`: fresh iff `now` has not passed `date`

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::time::Duration;

use crate::error::{CodeError, CodeResult};
use crate::models::{FreshnessPolicy, VerifyCode};

/// Timestamp layout used by the code file.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a code timestamp as local time.
///
/// Blank strings, other layouts, and local times that do not exist (DST gaps)
/// are `CodeError::Parse`. Ambiguous local times resolve to the earlier instant.
pub fn parse_timestamp(date: &str) -> CodeResult<DateTime<Local>> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return Err(CodeError::Parse("empty timestamp".to_string()));
    }

    let naive = NaiveDateTime::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| CodeError::Parse(format!("{:?}: {}", trimmed, e)))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| CodeError::Parse(format!("{:?} does not exist in local time", trimmed)))
}

/// Evaluates codes against one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessValidator {
    policy: FreshnessPolicy,
    window: Duration,
}

impl FreshnessValidator {
    pub fn new(policy: FreshnessPolicy, window: Duration) -> Self {
        Self { policy, window }
    }

    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    /// Decide whether `code` is fresh at `now`.
    ///
    /// A `Parse` error means the caller must treat the code as not fresh.
    pub fn is_fresh(&self, code: &VerifyCode, now: DateTime<Local>) -> CodeResult<bool> {
        let issued = parse_timestamp(&code.date)?;
        Ok(match self.policy {
            FreshnessPolicy::Expiry => now <= issued,
            FreshnessPolicy::Window => {
                let window = match chrono::Duration::from_std(self.window) {
                    Ok(window) => window,
                    // Larger than chrono can represent: everything is in range
                    Err(_) => return Ok(true),
                };
                let diff = now.signed_duration_since(issued);
                diff.abs() <= window
            }
        })
    }
}
