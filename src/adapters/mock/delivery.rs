//! Fake clipboard, injector and focus monitor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::traits::{ClipboardSink, FocusMonitor, KeystrokeInjector, SinkError};

/// Clipboard that records every successful write.
#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    writes: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ClipboardSink for RecordingClipboard {
    fn write(&self, text: &str) -> Result<(), SinkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError::WriteFailed("clipboard locked".to_string()));
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}

/// Injector that records typed text.
#[derive(Debug, Clone, Default)]
pub struct RecordingInjector {
    typed: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent injections fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn typed(&self) -> Vec<String> {
        self.typed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeystrokeInjector for RecordingInjector {
    fn type_text(&self, text: &str) -> Result<(), SinkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError::WriteFailed("SendInput rejected".to_string()));
        }
        self.typed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}

/// Focus monitor with a settable answer.
#[derive(Debug, Clone)]
pub struct FixedFocus {
    focused: Arc<AtomicBool>,
}

impl FixedFocus {
    pub fn new(focused: bool) -> Self {
        Self {
            focused: Arc::new(AtomicBool::new(focused)),
        }
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
    }
}

impl FocusMonitor for FixedFocus {
    fn has_focused_window(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}
