//! Provider fallback, retry rounds and stale-code handling.
//!
//! One call to [`RetrievalOrchestrator::retrieve`] runs up to
//! `max_attempts` rounds. A round tries every enabled provider in priority
//! order and stops at the first fresh code. Between rounds the calling task
//! sleeps according to the backoff policy. Failures are logged and recorded,
//! never propagated mid-run.
//!
//! A code that decodes but is not fresh is remembered; if the whole budget
//! passes without a fresh code, the most recent such code is returned as
//! [`RetrievalOutcome::Stale`]. Only when nothing decoded at all does the run
//! end in [`CodeError::Exhausted`].

use chrono::Local;
use std::sync::Arc;

use crate::error::{CodeError, ProviderFailure};
use crate::fetcher::ContentFetcher;
use crate::freshness::FreshnessValidator;
use crate::models::{ProviderConfig, RetrievalOutcome, RetrievalPolicy, VerifyCode};
use crate::traits::Sleeper;

/// Drives retrieval. Holds no per-run state, so concurrent calls are independent.
#[derive(Clone)]
pub struct RetrievalOrchestrator {
    fetcher: ContentFetcher,
    sleeper: Arc<dyn Sleeper>,
}

impl RetrievalOrchestrator {
    pub fn new(fetcher: ContentFetcher, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { fetcher, sleeper }
    }

    /// Run one retrieval against `providers` (declared priority order) under `policy`.
    pub async fn retrieve(
        &self,
        providers: &[ProviderConfig],
        policy: &RetrievalPolicy,
    ) -> RetrievalOutcome {
        let enabled: Vec<&ProviderConfig> = providers.iter().filter(|p| p.is_enabled()).collect();
        if enabled.is_empty() {
            tracing::warn!("No provider has a token configured; nothing to fetch");
            return RetrievalOutcome::Failed(CodeError::Exhausted {
                attempts: 0,
                failures: Vec::new(),
            });
        }

        let validator = FreshnessValidator::new(policy.freshness, policy.max_age_window);
        let max_attempts = policy.max_attempts();
        let mut stale: Option<VerifyCode> = None;
        let mut failures: Vec<ProviderFailure> = Vec::new();

        for attempt in 0..max_attempts {
            failures.clear();

            for provider in &enabled {
                let code = match self.fetcher.fetch(provider).await {
                    Ok(code) => code,
                    Err(error) => {
                        tracing::warn!(
                            provider = %provider.kind,
                            attempt = attempt + 1,
                            error_code = error.error_code(),
                            retryable = error.is_retryable(),
                            "Fetch failed: {}",
                            error
                        );
                        failures.push(ProviderFailure {
                            provider: provider.kind,
                            attempt,
                            error,
                        });
                        continue;
                    }
                };

                match validator.is_fresh(&code, Local::now()) {
                    Ok(true) => {
                        tracing::info!(
                            provider = %provider.kind,
                            attempt = attempt + 1,
                            date = %code.date,
                            "Fresh verification code retrieved"
                        );
                        return RetrievalOutcome::Fresh(code);
                    }
                    Ok(false) => {
                        tracing::debug!(
                            provider = %provider.kind,
                            attempt = attempt + 1,
                            date = %code.date,
                            policy = ?validator.policy(),
                            "Verification code is stale"
                        );
                    }
                    Err(error) => {
                        tracing::warn!(
                            provider = %provider.kind,
                            attempt = attempt + 1,
                            error_code = error.error_code(),
                            "Treating code as stale: {}",
                            error
                        );
                    }
                }
                stale = Some(code);
            }

            if attempt + 1 < max_attempts {
                let delay = policy.backoff_delay(attempt);
                tracing::debug!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "No fresh code this round, backing off"
                );
                self.sleeper.sleep(delay).await;
            }
        }

        match stale {
            Some(code) => {
                tracing::info!(
                    date = %code.date,
                    attempts = max_attempts,
                    "No fresh code within retry budget; falling back to stale code"
                );
                RetrievalOutcome::Stale(code)
            }
            None => RetrievalOutcome::Failed(CodeError::Exhausted {
                attempts: max_attempts,
                failures,
            }),
        }
    }
}
