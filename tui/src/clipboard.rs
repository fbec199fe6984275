//! System Clipboard
//!
//! Desktop clipboard behind the core's [`Clipboard`] seam. A fresh
//! `arboard::Clipboard` is opened per copy, so the adapter holds nothing
//! that would tie it to one thread.

use genblock_core::{Clipboard, ClipboardError};

/// Clipboard backed by the desktop environment
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// Create the adapter
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}
