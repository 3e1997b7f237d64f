//! Trait abstractions for dependency injection and testability.
//!
//! The retrieval core never touches the network, the clipboard, the keyboard
//! or the clock directly; it goes through these seams so tests can swap in
//! the fakes from `crate::adapters::mock`.
//!
//! # Traits
//!
//! - [`HttpClient`] - authenticated GET against a provider
//! - [`ClipboardSink`] - writes text to the system clipboard
//! - [`KeystrokeInjector`] - types text into the focused window
//! - [`FocusMonitor`] - reports whether a foreground window holds input focus
//! - [`Sleeper`] - waits between retrieval rounds

pub mod delivery;
pub mod http;
pub mod sleep;

pub use delivery::{ClipboardSink, FocusMonitor, KeystrokeInjector, SinkError};
pub use http::{Headers, HttpClient, HttpError, Response};
pub use sleep::Sleeper;
