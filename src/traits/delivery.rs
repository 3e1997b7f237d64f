//! Capabilities the dispatcher uses to reach the local desktop.
//!
//! These are deliberately synchronous: clipboard and input APIs are blocking
//! OS calls and finish in microseconds.

use thiserror::Error;

/// Failure reported by a clipboard sink or keystroke injector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The backend could not be opened on this system
    #[error("{0} unavailable: {1}")]
    Unavailable(&'static str, String),
    /// The backend was reached but the write failed
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Writes text to the system clipboard.
pub trait ClipboardSink: Send + Sync {
    fn write(&self, text: &str) -> Result<(), SinkError>;
}

/// Types text into whichever window currently holds focus.
///
/// Callers must check [`FocusMonitor::has_focused_window`] first.
pub trait KeystrokeInjector: Send + Sync {
    fn type_text(&self, text: &str) -> Result<(), SinkError>;

    /// Whether this build has a real input backend. Auto-fill is a no-op without one.
    fn is_available(&self) -> bool {
        true
    }
}

/// Reports whether a foreground window currently holds input focus.
pub trait FocusMonitor: Send + Sync {
    fn has_focused_window(&self) -> bool;
}
