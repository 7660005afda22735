//! Handles the widget reads from and renders into.
//!
//! [`InputField`] stands in for the `queryInput` text field and
//! [`MessageLog`] for the `messages` container. Both take `&self` so a
//! single widget can serve overlapping dispatches.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

/// A single-line text input.
pub trait InputField: Send + Sync {
    /// Current value, untrimmed.
    fn value(&self) -> String;

    /// Reset the value to the empty string.
    fn clear(&self);
}

/// The scrollable container bubbles are appended to.
pub trait MessageLog: Send + Sync {
    /// Append one rendered bubble after all existing ones.
    fn append(&self, bubble: &str);

    /// Bring the newest bubble into view.
    fn scroll_to_latest(&self);
}

impl<T: InputField + ?Sized> InputField for Arc<T> {
    fn value(&self) -> String {
        (**self).value()
    }

    fn clear(&self) {
        (**self).clear();
    }
}

impl<T: MessageLog + ?Sized> MessageLog for Arc<T> {
    fn append(&self, bubble: &str) {
        (**self).append(bubble);
    }

    fn scroll_to_latest(&self) {
        (**self).scroll_to_latest();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory text input
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory text input.
#[derive(Debug, Default)]
pub struct TextInput {
    value: Mutex<String>,
}

impl TextInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value, as if the user typed it.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}

impl InputField for TextInput {
    fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory message board
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory message log that tracks its scroll position.
#[derive(Debug, Default)]
pub struct MessageBoard {
    state: Mutex<BoardState>,
}

#[derive(Debug, Default)]
struct BoardState {
    bubbles: Vec<String>,
    /// Index of the bubble scrolled into view.
    scrolled_to: Option<usize>,
}

impl MessageBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered bubbles in arrival order.
    pub fn bubbles(&self) -> Vec<String> {
        self.lock().bubbles.clone()
    }

    /// Number of bubbles.
    pub fn len(&self) -> usize {
        self.lock().bubbles.len()
    }

    /// Whether the board has no bubbles.
    pub fn is_empty(&self) -> bool {
        self.lock().bubbles.is_empty()
    }

    /// Index of the bubble currently in view.
    pub fn scrolled_to(&self) -> Option<usize> {
        self.lock().scrolled_to
    }

    /// All bubbles joined into the container's inner HTML.
    pub fn html(&self) -> String {
        self.lock().bubbles.join("\n")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MessageLog for MessageBoard {
    fn append(&self, bubble: &str) {
        self.lock().bubbles.push(bubble.to_string());
    }

    fn scroll_to_latest(&self) {
        let mut state = self.lock();
        state.scrolled_to = state.bubbles.len().checked_sub(1);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming transcript
// ─────────────────────────────────────────────────────────────────────────────

/// Message log that streams each bubble to a writer as it arrives.
#[derive(Debug)]
pub struct TranscriptLog<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> TranscriptLog<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Write markup that is not a bubble (page header and footer).
    pub fn write_raw(&self, markup: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(markup.as_bytes())?;
        writer.flush()
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> MessageLog for TranscriptLog<W> {
    fn append(&self, bubble: &str) {
        if let Err(e) = self.write_raw(&format!("{bubble}\n")) {
            warn!(name: "transcript.write.failed", error = %e, "Failed to write bubble");
        }
    }

    // A stream only grows at its end, the newest bubble is always in view.
    fn scroll_to_latest(&self) {}
}
