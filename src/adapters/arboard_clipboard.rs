//! System clipboard sink backed by arboard.

use arboard::Clipboard;
use std::sync::{Mutex, PoisonError};

use crate::traits::{ClipboardSink, SinkError};

/// Writes verification codes to the OS clipboard (NSPasteboard, Win32, X11/Wayland).
///
/// The handle is opened on first write and kept for the life of the sink: on
/// X11 the clipboard contents are served by the owning process and vanish when
/// the handle is dropped. A failed write drops the handle so the next write
/// reconnects.
#[derive(Default)]
pub struct ArboardClipboard {
    handle: Mutex<Option<Clipboard>>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for ArboardClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArboardClipboard").finish_non_exhaustive()
    }
}

impl ClipboardSink for ArboardClipboard {
    fn write(&self, text: &str) -> Result<(), SinkError> {
        let mut guard = self.handle.lock().unwrap_or_else(PoisonError::into_inner);

        let mut clipboard = match guard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new()
                .map_err(|e| SinkError::Unavailable("clipboard", e.to_string()))?,
        };

        clipboard
            .set_text(text.to_string())
            .map_err(|e| SinkError::WriteFailed(e.to_string()))?;
        *guard = Some(clipboard);
        Ok(())
    }
}
