//! Outbound collaborators: clipboard and file writes.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::error::ClipboardError;

pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard. A fresh handle is opened per copy so a clipboard that
/// comes and goes (no selection owner on X11, locked on Windows) only fails
/// the copy that hit it.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

/// In-process clipboard. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    inner: Rc<RefCell<MemoryClipboardState>>,
}

#[derive(Debug, Default)]
struct MemoryClipboardState {
    history: Vec<String>,
    failure: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following copy fail with `reason`, or succeed again on `None`.
    pub fn set_failure(&self, reason: Option<&str>) {
        self.inner.borrow_mut().failure = reason.map(str::to_string);
    }

    pub fn contents(&self) -> Option<String> {
        self.inner.borrow().history.last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.inner.borrow().history.clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut state = self.inner.borrow_mut();
        if let Some(reason) = &state.failure {
            return Err(ClipboardError(reason.clone()));
        }
        state.history.push(text.to_string());
        Ok(())
    }
}

pub trait FileSink {
    /// Replace the file at `path` with `text`.
    fn write_log(&mut self, path: &Path, text: &str) -> std::io::Result<()>;
}

#[derive(Debug, Default)]
pub struct FsSink;

impl FileSink for FsSink {
    fn write_log(&mut self, path: &Path, text: &str) -> std::io::Result<()> {
        std::fs::write(path, text)
    }
}
