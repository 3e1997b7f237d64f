//! Keystroke backend used when no input-synthesis backend is compiled in.
//!
//! With [`HeadlessFocus`] reporting no focused window the dispatcher never calls
//! the injector, so auto-fill degrades to clipboard-only delivery.

use crate::traits::{FocusMonitor, KeystrokeInjector, SinkError};

/// Injector that refuses every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessInjector;

impl KeystrokeInjector for HeadlessInjector {
    fn type_text(&self, _text: &str) -> Result<(), SinkError> {
        Err(SinkError::Unavailable(
            "keystroke injector",
            "no input backend in this build".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Focus monitor that never sees a focused window.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessFocus;

impl FocusMonitor for HeadlessFocus {
    fn has_focused_window(&self) -> bool {
        false
    }
}
