//! Concrete implementations of trait abstractions.
//!
//! This module provides production adapters implementing the traits defined in
//! `crate::traits`.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`ArboardClipboard`] - system clipboard using arboard
//! - [`HeadlessInjector`] / [`HeadlessFocus`] - keystroke backend for builds without
//!   an input-synthesis backend
//! - [`TokioSleeper`] - tokio timer
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - queued per-URL HTTP responses
//! - [`mock::RecordingClipboard`] / [`mock::RecordingInjector`] - capture delivered text
//! - [`mock::FixedFocus`] - configurable focus state
//! - [`mock::RecordingSleeper`] - records requested sleeps without waiting

pub mod arboard_clipboard;
pub mod headless_input;
pub mod mock;
pub mod reqwest_http;
pub mod tokio_sleep;

pub use arboard_clipboard::ArboardClipboard;
pub use headless_input::{HeadlessFocus, HeadlessInjector};
pub use mock::{FixedFocus, MockHttpClient, RecordingClipboard, RecordingInjector, RecordingSleeper};
pub use reqwest_http::ReqwestHttpClient;
pub use tokio_sleep::TokioSleeper;
