//! Configuration file loading.
//!
//! The config is a JSON file with one section per provider and a `setting`
//! section. It is read once at startup and converted into the immutable
//! values the core consumes ([`ProviderConfig`], [`RetrievalPolicy`],
//! [`DeliveryOptions`]); nothing in the core reads it afterwards.
//!
//! # Lookup order
//!
//! 1. `--config <path>`
//! 2. `$CODEFETCH_CONFIG`
//! 3. `./config.json`
//! 4. `<config dir>/codefetch/config.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::hotkey::Hotkey;
use crate::models::{
    AuthStyle, BackoffPolicy, FreshnessPolicy, ProviderConfig, ProviderKind, RetrievalPolicy,
};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CODEFETCH_CONFIG";

/// Config file name used in the working directory and the config dir.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// One provider section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    pub token: String,
    pub repository: String,
    pub path: String,
    /// Override for the API base URL
    pub api_base: Option<String>,
    /// Gitee only: send the token as `access_token` query parameter (default)
    /// instead of an `Authorization` header
    pub token_in_query: Option<bool>,
}

/// The `setting` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Polling interval in seconds; 0 disables the timer trigger
    pub interval: u64,
    /// Global hotkey descriptor, e.g. `"Ctrl Shift A"`; empty disables it
    pub hotkey: String,
    pub max_date_diff_seconds: u64,
    pub polling_interval_milliseconds: u64,
    pub max_polling_attempts: u32,
    pub backoff: BackoffPolicy,
    pub freshness: FreshnessPolicy,
    pub auto_fill: bool,
    /// Log file appended to alongside stdout; empty disables file logging
    pub log_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval: 0,
            hotkey: String::new(),
            max_date_diff_seconds: 300,
            polling_interval_milliseconds: 1000,
            max_polling_attempts: 3,
            backoff: BackoffPolicy::Fixed,
            freshness: FreshnessPolicy::Window,
            auto_fill: true,
            log_file: "codefetch.log".to_string(),
        }
    }
}

/// Whole config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub github: ProviderSection,
    pub gitee: ProviderSection,
    pub setting: Settings,
}

/// Delivery switches derived from the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub auto_fill: bool,
}

impl AppConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Locate the config file and load it. See the module docs for the lookup order.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let path = resolve_path(
            explicit,
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            dirs::config_dir(),
        )?;
        let config = Self::load(&path)?;
        Ok((config, path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.setting.max_polling_attempts < 1 {
            return Err(ConfigError::Invalid(
                "setting.max_polling_attempts must be at least 1".to_string(),
            ));
        }
        self.hotkey()?;
        for (kind, section) in self.sections() {
            if !section.token.trim().is_empty() && section.repository.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{}.repository is required when a token is set",
                    kind
                )));
            }
        }
        Ok(())
    }

    pub fn section(&self, kind: ProviderKind) -> &ProviderSection {
        match kind {
            ProviderKind::GitHub => &self.github,
            ProviderKind::Gitee => &self.gitee,
        }
    }

    fn sections(&self) -> [(ProviderKind, &ProviderSection); 2] {
        ProviderKind::PRIORITY.map(|kind| (kind, self.section(kind)))
    }

    /// Providers in priority order. Disabled ones (no token) are included and
    /// skipped by the orchestrator.
    pub fn providers(&self) -> Vec<ProviderConfig> {
        self.sections()
            .into_iter()
            .map(|(kind, section)| {
                let mut provider = ProviderConfig::new(
                    kind,
                    section.token.trim(),
                    section.repository.trim(),
                    section.path.trim(),
                );
                provider.api_base = section.api_base.clone().filter(|b| !b.trim().is_empty());
                if let Some(in_query) = section.token_in_query {
                    provider.auth_style = Some(if in_query {
                        AuthStyle::Query
                    } else {
                        AuthStyle::Header
                    });
                }
                provider
            })
            .collect()
    }

    pub fn retrieval_policy(&self) -> RetrievalPolicy {
        let setting = &self.setting;
        RetrievalPolicy::new(
            setting.max_polling_attempts,
            Duration::from_millis(setting.polling_interval_milliseconds),
            Duration::from_secs(setting.max_date_diff_seconds),
        )
        .with_backoff(setting.backoff)
        .with_freshness(setting.freshness)
    }

    pub fn delivery_options(&self) -> DeliveryOptions {
        DeliveryOptions {
            auto_fill: self.setting.auto_fill,
        }
    }

    /// Timer period, if the timer trigger is enabled.
    pub fn polling_interval(&self) -> Option<Duration> {
        (self.setting.interval > 0).then(|| Duration::from_secs(self.setting.interval))
    }

    /// Parsed hotkey, if one is configured.
    pub fn hotkey(&self) -> Result<Option<Hotkey>, ConfigError> {
        let descriptor = self.setting.hotkey.trim();
        if descriptor.is_empty() {
            return Ok(None);
        }
        descriptor
            .parse::<Hotkey>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid(format!("setting.hotkey: {}", e)))
    }

    /// Log file path, if file logging is enabled.
    pub fn log_file(&self) -> Option<PathBuf> {
        let file = self.setting.log_file.trim();
        (!file.is_empty()).then(|| PathBuf::from(file))
    }
}

fn resolve_path(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }

    let mut searched = Vec::new();
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(local);
    }
    searched.push(local);

    if let Some(dir) = config_dir {
        let candidate = dir.join("codefetch").join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        searched.push(candidate);
    }

    Err(ConfigError::NotFound(searched))
}
