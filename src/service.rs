//! One retrieval plus delivery per trigger event.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::dispatcher::DeliveryDispatcher;
use crate::fetcher::ContentFetcher;
use crate::models::{
    DeliveryResult, ProviderConfig, RetrievalOutcome, RetrievalPolicy, TriggerSource,
};
use crate::orchestrator::RetrievalOrchestrator;
use crate::traits::{HttpClient, Sleeper};

/// What a single run produced.
#[derive(Debug)]
pub struct RunReport {
    pub source: TriggerSource,
    pub outcome: RetrievalOutcome,
    /// `None` when there was no code to deliver
    pub delivery: Option<DeliveryResult>,
}

impl RunReport {
    pub fn code(&self) -> Option<&str> {
        self.outcome.code().map(|c| c.code.as_str())
    }
}

/// Wires the orchestrator to the dispatcher with the configured providers and policy.
///
/// Cheap to clone; clones share the dispatcher and therefore its delivery state.
#[derive(Clone)]
pub struct CodeService {
    orchestrator: RetrievalOrchestrator,
    dispatcher: Arc<DeliveryDispatcher>,
    providers: Arc<[ProviderConfig]>,
    policy: RetrievalPolicy,
    auto_fill: bool,
}

impl CodeService {
    pub fn new(
        orchestrator: RetrievalOrchestrator,
        dispatcher: Arc<DeliveryDispatcher>,
        providers: Vec<ProviderConfig>,
        policy: RetrievalPolicy,
    ) -> Self {
        Self {
            orchestrator,
            dispatcher,
            providers: providers.into(),
            policy,
            auto_fill: true,
        }
    }

    /// Build a service from a loaded config and the runtime's adapters.
    pub fn from_config(
        config: &AppConfig,
        http: Arc<dyn HttpClient>,
        sleeper: Arc<dyn Sleeper>,
        dispatcher: Arc<DeliveryDispatcher>,
    ) -> Self {
        let orchestrator = RetrievalOrchestrator::new(ContentFetcher::new(http), sleeper);
        Self::new(
            orchestrator,
            dispatcher,
            config.providers(),
            config.retrieval_policy(),
        )
        .with_auto_fill(config.delivery_options().auto_fill)
    }

    /// Global auto-fill switch. Trigger sources may still disallow it.
    pub fn with_auto_fill(mut self, auto_fill: bool) -> Self {
        self.auto_fill = auto_fill;
        self
    }

    pub fn dispatcher(&self) -> &Arc<DeliveryDispatcher> {
        &self.dispatcher
    }

    /// Retrieve a code and hand it to the dispatcher.
    pub async fn run_once(&self, source: TriggerSource) -> RunReport {
        tracing::debug!(source = %source, "Retrieval triggered");

        let outcome = self.orchestrator.retrieve(&self.providers, &self.policy).await;

        let delivery = match outcome.code() {
            Some(code) => {
                tracing::debug!(
                    source = %source,
                    code = %code.code,
                    "Delivering verification code"
                );
                let auto_fill = self.auto_fill && source.allows_autofill();
                Some(self.dispatcher.deliver(&outcome, auto_fill).await)
            }
            None => None,
        };

        match (&outcome, &delivery) {
            (RetrievalOutcome::Failed(error), _) => {
                tracing::error!(
                    source = %source,
                    error_code = error.error_code(),
                    "Retrieval failed: {}",
                    error
                );
            }
            (_, Some(DeliveryResult::PartialFailure { message, .. })) => {
                tracing::warn!(
                    source = %source,
                    outcome = outcome.label(),
                    error_code = "DELIVERY",
                    "Delivery incomplete: {}",
                    message
                );
            }
            (_, delivery) => {
                tracing::info!(
                    source = %source,
                    outcome = outcome.label(),
                    delivery = ?delivery,
                    "Run finished"
                );
            }
        }

        RunReport {
            source,
            outcome,
            delivery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{
        FixedFocus, MockHttpClient, MockResponse, RecordingClipboard, RecordingInjector,
        RecordingSleeper,
    };
    use crate::error::CodeError;
    use crate::freshness::DATE_FORMAT;
    use crate::models::ProviderKind;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use chrono::Local;
    use std::time::Duration;

    const GITHUB_URL: &str = "https://api.github.com/repos/me/codes/contents/code.json";

    struct Harness {
        client: MockHttpClient,
        clipboard: RecordingClipboard,
        injector: RecordingInjector,
        service: CodeService,
    }

    fn body(date: &str, code: &str) -> String {
        let payload = serde_json::json!({ "date": date, "verifyCode": code }).to_string();
        serde_json::json!({ "content": BASE64.encode(payload), "encoding": "base64" }).to_string()
    }

    fn now_date() -> String {
        Local::now().format(DATE_FORMAT).to_string()
    }

    fn harness(auto_fill: bool) -> Harness {
        let client = MockHttpClient::new();
        let clipboard = RecordingClipboard::new();
        let injector = RecordingInjector::new();
        let orchestrator = RetrievalOrchestrator::new(
            ContentFetcher::new(Arc::new(client.clone())),
            Arc::new(RecordingSleeper::new()),
        );
        let dispatcher = Arc::new(DeliveryDispatcher::new(
            Arc::new(clipboard.clone()),
            Arc::new(injector.clone()),
            Arc::new(FixedFocus::new(true)),
        ));
        let providers = vec![ProviderConfig::new(
            ProviderKind::GitHub,
            "gh",
            "me/codes",
            "code.json",
        )];
        let policy = RetrievalPolicy::new(2, Duration::from_millis(10), Duration::from_secs(300));
        let service =
            CodeService::new(orchestrator, dispatcher, providers, policy).with_auto_fill(auto_fill);
        Harness {
            client,
            clipboard,
            injector,
            service,
        }
    }

    #[tokio::test]
    async fn test_timer_run_delivers_and_types() {
        let h = harness(true);
        h.client
            .set_response(GITHUB_URL, MockResponse::status(200, body(&now_date(), "123456")));

        let report = h.service.run_once(TriggerSource::Timer).await;

        assert!(report.outcome.is_fresh());
        assert_eq!(report.code(), Some("123456"));
        assert_eq!(report.delivery, Some(DeliveryResult::Delivered));
        assert_eq!(h.clipboard.writes(), vec!["123456"]);
        assert_eq!(h.injector.typed(), vec!["123456"]);
    }

    #[tokio::test]
    async fn test_startup_and_manual_never_type() {
        let h = harness(true);
        h.client
            .push_response(GITHUB_URL, MockResponse::status(200, body(&now_date(), "111111")));
        h.client
            .push_response(GITHUB_URL, MockResponse::status(200, body(&now_date(), "222222")));

        h.service.run_once(TriggerSource::Startup).await;
        h.service.run_once(TriggerSource::Manual).await;

        assert_eq!(h.clipboard.writes(), vec!["111111", "222222"]);
        assert!(h.injector.typed().is_empty());
    }

    #[tokio::test]
    async fn test_global_autofill_off() {
        let h = harness(false);
        h.client
            .set_response(GITHUB_URL, MockResponse::status(200, body(&now_date(), "123456")));

        h.service.run_once(TriggerSource::Hotkey).await;

        assert_eq!(h.clipboard.writes(), vec!["123456"]);
        assert!(h.injector.typed().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_trigger_skips_duplicate() {
        let h = harness(true);
        h.client
            .set_response(GITHUB_URL, MockResponse::status(200, body(&now_date(), "123456")));

        let first = h.service.run_once(TriggerSource::Timer).await;
        let second = h.service.run_once(TriggerSource::Hotkey).await;

        assert_eq!(first.delivery, Some(DeliveryResult::Delivered));
        assert_eq!(second.delivery, Some(DeliveryResult::Skipped));
        assert_eq!(h.clipboard.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_code_is_still_delivered() {
        let h = harness(false);
        h.client.set_response(
            GITHUB_URL,
            MockResponse::status(200, body("2000-01-01 00:00:00", "424242")),
        );

        let report = h.service.run_once(TriggerSource::Timer).await;

        assert_eq!(report.outcome.label(), "stale");
        assert_eq!(report.delivery, Some(DeliveryResult::Delivered));
        assert_eq!(h.clipboard.writes(), vec!["424242"]);
    }

    #[tokio::test]
    async fn test_exhausted_run_delivers_nothing() {
        let h = harness(true);
        h.client
            .set_response(GITHUB_URL, MockResponse::status(503, "unavailable"));

        let report = h.service.run_once(TriggerSource::Timer).await;

        assert!(report.delivery.is_none());
        assert!(matches!(
            report.outcome,
            RetrievalOutcome::Failed(CodeError::Exhausted { attempts: 2, .. })
        ));
        assert!(h.clipboard.writes().is_empty());
        assert!(h.service.dispatcher().last_delivered().await.is_none());
    }
}
