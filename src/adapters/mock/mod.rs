//! Mock implementations for testing.
//!
//! This module provides mock implementations of all trait abstractions,
//! enabling unit testing without network access, a desktop session or real
//! sleeps.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with queued responses per URL
//! - [`RecordingClipboard`] - clipboard that records writes, optionally failing
//! - [`RecordingInjector`] - keystroke injector that records typed text
//! - [`FixedFocus`] - focus monitor with a settable answer
//! - [`RecordingSleeper`] - sleeper that records durations and returns at once

pub mod delivery;
pub mod http;
pub mod sleep;

pub use delivery::{FixedFocus, RecordingClipboard, RecordingInjector};
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use sleep::RecordingSleeper;
