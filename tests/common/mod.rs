//! Common test utilities for integration tests.
//!
//! Builds a [`CodeService`] from a JSON config pointed at a local wiremock
//! server, with the real reqwest client and recording fakes for the clipboard,
//! keyboard and sleeps.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let harness = Harness::from_config(&github_only_config(&server.uri()));
//! let report = harness.service.run_once(TriggerSource::Timer).await;
//! ```

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Local;
use std::sync::Arc;

use codefetch::adapters::mock::{
    FixedFocus, RecordingClipboard, RecordingInjector, RecordingSleeper,
};
use codefetch::adapters::ReqwestHttpClient;
use codefetch::config::AppConfig;
use codefetch::dispatcher::DeliveryDispatcher;
use codefetch::freshness::DATE_FORMAT;
use codefetch::service::CodeService;

pub const REPO: &str = "me/codes";
pub const FILE: &str = "code.json";
pub const GITHUB_PATH: &str = "/repos/me/codes/contents/code.json";
pub const GITEE_PATH: &str = "/api/v5/repos/me/codes/contents/code.json";
pub const GITHUB_TOKEN: &str = "gh-token";
pub const GITEE_TOKEN: &str = "ge-token";
pub const OLD_DATE: &str = "2000-01-01 00:00:00";

/// Current local time in the code file's layout.
pub fn now_date() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Base64 of the code payload.
pub fn encoded_payload(date: &str, code: &str) -> String {
    let payload = serde_json::json!({ "date": date, "verifyCode": code }).to_string();
    BASE64.encode(payload)
}

/// Provider contents envelope with the given encoding tag.
pub fn contents_body(date: &str, code: &str, encoding: &str) -> serde_json::Value {
    serde_json::json!({
        "name": FILE,
        "path": FILE,
        "content": encoded_payload(date, code),
        "encoding": encoding,
    })
}

/// Config with only GitHub enabled, talking to `base`.
pub fn github_only_config(base: &str) -> serde_json::Value {
    serde_json::json!({
        "github": { "token": GITHUB_TOKEN, "repository": REPO, "path": FILE, "api_base": base },
        "setting": {
            "max_polling_attempts": 3,
            "polling_interval_milliseconds": 1000,
            "log_file": ""
        }
    })
}

/// Config with both providers enabled against the same server.
pub fn both_providers_config(base: &str, attempts: u32) -> serde_json::Value {
    serde_json::json!({
        "github": { "token": GITHUB_TOKEN, "repository": REPO, "path": FILE, "api_base": base },
        "gitee": { "token": GITEE_TOKEN, "repository": REPO, "path": FILE, "api_base": base },
        "setting": {
            "max_polling_attempts": attempts,
            "polling_interval_milliseconds": 1000,
            "log_file": ""
        }
    })
}

pub struct Harness {
    pub clipboard: RecordingClipboard,
    pub injector: RecordingInjector,
    pub sleeper: RecordingSleeper,
    pub service: CodeService,
}

impl Harness {
    pub fn from_config(config: &serde_json::Value) -> Self {
        let config = AppConfig::from_json(&config.to_string(), std::path::Path::new("test.json"))
            .expect("test config should be valid");
        Self::from_app_config(&config)
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        let clipboard = RecordingClipboard::new();
        let injector = RecordingInjector::new();
        let sleeper = RecordingSleeper::new();
        let dispatcher = Arc::new(DeliveryDispatcher::new(
            Arc::new(clipboard.clone()),
            Arc::new(injector.clone()),
            Arc::new(FixedFocus::new(true)),
        ));
        let http = ReqwestHttpClient::new().expect("reqwest client should build");
        let service = CodeService::from_config(
            config,
            Arc::new(http),
            Arc::new(sleeper.clone()),
            dispatcher,
        );
        Self {
            clipboard,
            injector,
            sleeper,
            service,
        }
    }
}
