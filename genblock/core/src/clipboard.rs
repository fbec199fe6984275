//! Clipboard Seam
//!
//! The copy action sits beside the state machine, not inside it: it is
//! refused while a regeneration runs, and a failed write is logged and
//! reported but never touches the phase.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Clipboard write failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard could be opened
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard rejected the write
    #[error("Failed to write clipboard: {0}")]
    WriteFailed(String),
}

/// Somewhere copied text can go
pub trait Clipboard: Send {
    /// Place `text` on the clipboard
    ///
    /// # Errors
    ///
    /// Returns a [`ClipboardError`] if the write fails.
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Result of a copy request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text is on the clipboard
    Copied,
    /// Refused: a regeneration is running
    Busy,
    /// The write failed; nothing else changed
    Failed(ClipboardError),
}

/// In-memory clipboard for headless use and tests
///
/// Clones share the same buffer, so a test can keep one clone while the
/// engine owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    fail_with: Option<ClipboardError>,
}

impl MemoryClipboard {
    /// Create an empty clipboard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails with `error`
    #[must_use]
    pub fn failing(error: ClipboardError) -> Self {
        Self {
            contents: Arc::default(),
            fail_with: Some(error),
        }
    }

    /// Last text written
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(ref error) = self.fail_with {
            return Err(error.clone());
        }
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}
