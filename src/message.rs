//! Log message sources.
//!
//! [`write_log`] takes any [`Message`] by reference and renders it through
//! dynamic dispatch, so a [`DecoratedMessage`] keeps its decoration. Turning
//! a decorated message into a [`PlainMessage`] is an explicit `From`
//! conversion that drops the decoration.

use tracing::info;

/// Default text of a fresh [`PlainMessage`]
pub const DEFAULT_MESSAGE: &str = "BASE LOGGER INITIALIZED";

/// Something that renders a log line
pub trait Message {
    fn text(&self) -> String;
}

/// Message rendered as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainMessage {
    text: String,
}

impl PlainMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The undecorated text
    pub fn raw(&self) -> &str {
        &self.text
    }
}

impl Default for PlainMessage {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE)
    }
}

impl Message for PlainMessage {
    fn text(&self) -> String {
        self.text.clone()
    }
}

/// Message wrapped in a fixed decoration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedMessage {
    inner: PlainMessage,
}

impl DecoratedMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: PlainMessage::new(text),
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.inner.set_text(text);
    }
}

impl Message for DecoratedMessage {
    fn text(&self) -> String {
        format!("Decorated Log Message: ({})", self.inner.raw())
    }
}

impl From<DecoratedMessage> for PlainMessage {
    fn from(message: DecoratedMessage) -> Self {
        message.inner
    }
}

/// Render `message` and emit it as a log event
pub fn write_log(message: &dyn Message) -> String {
    let text = message.text();
    info!(text = %text, "log written");
    text
}
