//! Delivery of retrieved codes to the local desktop.
//!
//! The dispatcher owns the only shared mutable state in the process: the last
//! code it delivered and when that code was issued. Every delivery runs inside
//! one async mutex, so two triggers racing with the same new code produce
//! exactly one delivery, and a slow run ending in an older code can never
//! replace a newer one that was already delivered.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::freshness::parse_timestamp;
use crate::models::{DeliveryResult, RetrievalOutcome};
use crate::traits::{ClipboardSink, FocusMonitor, KeystrokeInjector};

/// Process-lifetime delivery state. Never persisted.
#[derive(Debug, Default)]
struct DeliveryState {
    last_delivered_code: Option<String>,
    /// Issue time of the last delivered code, when its date parsed
    last_delivered_at: Option<DateTime<Local>>,
}

impl DeliveryState {
    /// Whether a code issued at `issued` must not replace the current one.
    fn supersedes(&self, issued: Option<DateTime<Local>>, stale: bool) -> bool {
        if self.last_delivered_code.is_none() {
            return false;
        }
        match (issued, self.last_delivered_at) {
            (Some(issued), Some(last)) => issued < last,
            // An undated stale code never displaces a delivered one
            (None, _) => stale,
            (Some(_), None) => false,
        }
    }
}

/// Writes codes to the clipboard and, when allowed, types them.
pub struct DeliveryDispatcher {
    state: Mutex<DeliveryState>,
    clipboard: Arc<dyn ClipboardSink>,
    injector: Arc<dyn KeystrokeInjector>,
    focus: Arc<dyn FocusMonitor>,
}

impl DeliveryDispatcher {
    pub fn new(
        clipboard: Arc<dyn ClipboardSink>,
        injector: Arc<dyn KeystrokeInjector>,
        focus: Arc<dyn FocusMonitor>,
    ) -> Self {
        Self {
            state: Mutex::new(DeliveryState::default()),
            clipboard,
            injector,
            focus,
        }
    }

    /// The last code delivered, if any.
    pub async fn last_delivered(&self) -> Option<String> {
        self.state.lock().await.last_delivered_code.clone()
    }

    /// Whether auto-fill can type anything with the configured injector.
    pub fn autofill_available(&self) -> bool {
        self.injector.is_available()
    }

    /// Deliver the code carried by `outcome`.
    ///
    /// `Skipped` when the code equals the last delivered one, or when it was
    /// issued before it. A stale code with an unreadable date never replaces
    /// an earlier delivery. `auto_fill` requests keystroke injection, which
    /// only happens when a focused window exists.
    ///
    /// The state is recorded before any effect runs, so a failed effect is
    /// reported once and never repeated for the same code.
    pub async fn deliver(&self, outcome: &RetrievalOutcome, auto_fill: bool) -> DeliveryResult {
        let (code, stale) = match outcome {
            RetrievalOutcome::Fresh(code) => (code, false),
            RetrievalOutcome::Stale(code) => (code, true),
            RetrievalOutcome::Failed(_) => return DeliveryResult::Skipped,
        };

        let mut state = self.state.lock().await;

        if state.last_delivered_code.as_deref() == Some(code.code.as_str()) {
            tracing::debug!("Code already delivered, skipping");
            return DeliveryResult::Skipped;
        }

        let issued = parse_timestamp(&code.date).ok();
        if state.supersedes(issued, stale) {
            tracing::info!(
                date = %code.date,
                outcome = outcome.label(),
                "Code is older than the last delivered one, skipping"
            );
            return DeliveryResult::Skipped;
        }

        state.last_delivered_code = Some(code.code.clone());
        state.last_delivered_at = issued;

        let mut errors = Vec::new();

        let clipboard_ok = match self.clipboard.write(&code.code) {
            Ok(()) => {
                tracing::info!(date = %code.date, "Verification code copied to clipboard");
                true
            }
            Err(e) => {
                tracing::warn!(error_code = "DELIVERY", "Clipboard write failed: {}", e);
                errors.push(format!("clipboard: {}", e));
                false
            }
        };

        let injection_ok = if !auto_fill {
            true
        } else if !self.focus.has_focused_window() {
            tracing::debug!("No focused window, skipping auto-fill");
            true
        } else {
            match self.injector.type_text(&code.code) {
                Ok(()) => {
                    tracing::info!("Verification code typed into focused window");
                    true
                }
                Err(e) => {
                    tracing::warn!(error_code = "DELIVERY", "Keystroke injection failed: {}", e);
                    errors.push(format!("keystroke injection: {}", e));
                    false
                }
            }
        };

        if errors.is_empty() {
            DeliveryResult::Delivered
        } else {
            DeliveryResult::PartialFailure {
                clipboard_ok,
                injection_ok,
                message: errors.join("; "),
            }
        }
    }

    /// Put the last delivered code back on the clipboard without fetching.
    ///
    /// `None` when nothing has been delivered yet. Never types.
    pub async fn recopy_last(&self) -> Option<DeliveryResult> {
        let state = self.state.lock().await;
        let code = state.last_delivered_code.as_deref()?;

        Some(match self.clipboard.write(code) {
            Ok(()) => {
                tracing::info!("Last verification code copied to clipboard again");
                DeliveryResult::Delivered
            }
            Err(e) => {
                tracing::warn!(error_code = "DELIVERY", "Clipboard write failed: {}", e);
                DeliveryResult::PartialFailure {
                    clipboard_ok: false,
                    injection_ok: true,
                    message: format!("clipboard: {}", e),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{FixedFocus, RecordingClipboard, RecordingInjector};
    use crate::adapters::HeadlessInjector;
    use crate::error::CodeError;
    use crate::models::VerifyCode;

    struct Harness {
        clipboard: RecordingClipboard,
        injector: RecordingInjector,
        focus: FixedFocus,
        dispatcher: Arc<DeliveryDispatcher>,
    }

    fn harness(focused: bool) -> Harness {
        let clipboard = RecordingClipboard::new();
        let injector = RecordingInjector::new();
        let focus = FixedFocus::new(focused);
        let dispatcher = Arc::new(DeliveryDispatcher::new(
            Arc::new(clipboard.clone()),
            Arc::new(injector.clone()),
            Arc::new(focus.clone()),
        ));
        Harness {
            clipboard,
            injector,
            focus,
            dispatcher,
        }
    }

    fn fresh(value: &str) -> RetrievalOutcome {
        RetrievalOutcome::Fresh(VerifyCode::new("2024-05-01 12:00:00", value))
    }

    fn fresh_at(date: &str, value: &str) -> RetrievalOutcome {
        RetrievalOutcome::Fresh(VerifyCode::new(date, value))
    }

    fn stale_at(date: &str, value: &str) -> RetrievalOutcome {
        RetrievalOutcome::Stale(VerifyCode::new(date, value))
    }

    #[tokio::test]
    async fn test_duplicate_delivery_is_skipped() {
        let h = harness(true);

        let first = h.dispatcher.deliver(&fresh("123456"), true).await;
        let second = h.dispatcher.deliver(&fresh("123456"), true).await;

        assert_eq!(first, DeliveryResult::Delivered);
        assert_eq!(second, DeliveryResult::Skipped);
        assert_eq!(h.clipboard.writes(), vec!["123456"]);
        assert_eq!(h.injector.typed(), vec!["123456"]);
    }

    #[tokio::test]
    async fn test_new_code_replaces_last() {
        let h = harness(false);

        h.dispatcher.deliver(&fresh("111111"), false).await;
        assert_eq!(h.dispatcher.last_delivered().await.as_deref(), Some("111111"));

        let result = h.dispatcher.deliver(&fresh("222222"), false).await;
        assert_eq!(result, DeliveryResult::Delivered);
        assert_eq!(h.dispatcher.last_delivered().await.as_deref(), Some("222222"));
        assert_eq!(h.clipboard.writes(), vec!["111111", "222222"]);
    }

    #[tokio::test]
    async fn test_failed_outcome_is_skipped() {
        let h = harness(true);
        let failed = RetrievalOutcome::Failed(CodeError::Exhausted {
            attempts: 1,
            failures: Vec::new(),
        });

        assert_eq!(h.dispatcher.deliver(&failed, true).await, DeliveryResult::Skipped);
        assert!(h.clipboard.writes().is_empty());
    }

    #[tokio::test]
    async fn test_autofill_requires_focus() {
        let h = harness(false);

        let result = h.dispatcher.deliver(&fresh("123456"), true).await;

        assert_eq!(result, DeliveryResult::Delivered);
        assert_eq!(h.clipboard.writes(), vec!["123456"]);
        assert!(h.injector.typed().is_empty());

        h.focus.set_focused(true);
        h.dispatcher.deliver(&fresh("654321"), true).await;
        assert_eq!(h.injector.typed(), vec!["654321"]);
    }

    #[tokio::test]
    async fn test_autofill_disabled_never_types() {
        let h = harness(true);

        h.dispatcher.deliver(&fresh("123456"), false).await;

        assert!(h.injector.typed().is_empty());
    }

    #[tokio::test]
    async fn test_injector_failure_keeps_clipboard_write() {
        let h = harness(true);
        h.injector.set_failing(true);

        let result = h.dispatcher.deliver(&fresh("123456"), true).await;

        match result {
            DeliveryResult::PartialFailure {
                clipboard_ok,
                injection_ok,
                message,
            } => {
                assert!(clipboard_ok);
                assert!(!injection_ok);
                assert!(message.contains("keystroke injection"));
            }
            other => panic!("Expected PartialFailure, got {:?}", other),
        }
        assert_eq!(h.clipboard.writes(), vec!["123456"]);
        assert_eq!(h.dispatcher.last_delivered().await.as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn test_clipboard_failure_still_records_code() {
        let h = harness(true);
        h.clipboard.set_failing(true);

        let first = h.dispatcher.deliver(&fresh("123456"), true).await;
        let second = h.dispatcher.deliver(&fresh("123456"), true).await;

        assert!(matches!(
            first,
            DeliveryResult::PartialFailure {
                clipboard_ok: false,
                injection_ok: true,
                ..
            }
        ));
        assert_eq!(second, DeliveryResult::Skipped);
        // Typed exactly once even though the clipboard kept failing
        assert_eq!(h.injector.typed(), vec!["123456"]);
        assert_eq!(h.dispatcher.last_delivered().await.as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn test_older_stale_code_does_not_replace_newer_delivery() {
        let h = harness(false);

        let newer = h
            .dispatcher
            .deliver(&fresh_at("2024-05-01 12:05:00", "222222"), false)
            .await;
        let older = h
            .dispatcher
            .deliver(&stale_at("2024-05-01 12:00:00", "111111"), false)
            .await;

        assert_eq!(newer, DeliveryResult::Delivered);
        assert_eq!(older, DeliveryResult::Skipped);
        assert_eq!(h.clipboard.writes(), vec!["222222"]);
        assert_eq!(h.dispatcher.last_delivered().await.as_deref(), Some("222222"));
    }

    #[tokio::test]
    async fn test_older_fresh_code_is_skipped_too() {
        let h = harness(false);

        h.dispatcher
            .deliver(&fresh_at("2024-05-01 12:05:00", "222222"), false)
            .await;
        let result = h
            .dispatcher
            .deliver(&fresh_at("2024-05-01 12:04:00", "111111"), false)
            .await;

        assert_eq!(result, DeliveryResult::Skipped);
        assert_eq!(h.dispatcher.last_delivered().await.as_deref(), Some("222222"));
    }

    #[tokio::test]
    async fn test_newer_stale_code_replaces_older_one() {
        let h = harness(false);

        h.dispatcher
            .deliver(&stale_at("2024-05-01 12:00:00", "111111"), false)
            .await;
        let result = h
            .dispatcher
            .deliver(&stale_at("2024-05-01 12:05:00", "222222"), false)
            .await;

        assert_eq!(result, DeliveryResult::Delivered);
        assert_eq!(h.clipboard.writes(), vec!["111111", "222222"]);
    }

    #[tokio::test]
    async fn test_undated_stale_code_only_delivered_first() {
        let h = harness(false);

        let first = h.dispatcher.deliver(&stale_at("", "111111"), false).await;
        assert_eq!(first, DeliveryResult::Delivered);

        let second = h.dispatcher.deliver(&stale_at("soon", "222222"), false).await;
        assert_eq!(second, DeliveryResult::Skipped);
        assert_eq!(h.dispatcher.last_delivered().await.as_deref(), Some("111111"));
    }

    #[tokio::test]
    async fn test_recopy_last() {
        let h = harness(true);

        assert_eq!(h.dispatcher.recopy_last().await, None);

        h.dispatcher.deliver(&fresh("123456"), false).await;
        let result = h.dispatcher.recopy_last().await;

        assert_eq!(result, Some(DeliveryResult::Delivered));
        assert_eq!(h.clipboard.writes(), vec!["123456", "123456"]);
        assert!(h.injector.typed().is_empty());

        h.clipboard.set_failing(true);
        assert!(matches!(
            h.dispatcher.recopy_last().await,
            Some(DeliveryResult::PartialFailure {
                clipboard_ok: false,
                ..
            })
        ));
    }

    #[test]
    fn test_autofill_available_follows_injector() {
        let recording = DeliveryDispatcher::new(
            Arc::new(RecordingClipboard::new()),
            Arc::new(RecordingInjector::new()),
            Arc::new(FixedFocus::new(true)),
        );
        assert!(recording.autofill_available());

        let headless = DeliveryDispatcher::new(
            Arc::new(RecordingClipboard::new()),
            Arc::new(HeadlessInjector),
            Arc::new(FixedFocus::new(true)),
        );
        assert!(!headless.autofill_available());
    }

    #[tokio::test]
    async fn test_concurrent_same_code_delivers_once() {
        let h = harness(false);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let dispatcher = Arc::clone(&h.dispatcher);
            handles.push(tokio::spawn(async move {
                let outcome = fresh("999999");
                dispatcher.deliver(&outcome, false).await
            }));
        }

        let mut delivered = 0;
        let mut skipped = 0;
        for handle in handles {
            match handle.await.unwrap() {
                DeliveryResult::Delivered => delivered += 1,
                DeliveryResult::Skipped => skipped += 1,
                other => panic!("Unexpected result {:?}", other),
            }
        }

        assert_eq!(delivered, 1);
        assert_eq!(skipped, 15);
        assert_eq!(h.clipboard.writes().len(), 1);
    }
}
