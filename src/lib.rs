//! codefetch - fetch short-lived verification codes from a GitHub or Gitee
//! repository and deliver them to the desktop.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod freshness;
pub mod hotkey;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod provider;
pub mod service;
pub mod traits;
pub mod triggers;
