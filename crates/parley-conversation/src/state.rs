// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observable conversation state.

use parley_core::Message;

/// Greeting every conversation starts with, and returns to on reset.
pub const SEED_MESSAGE: &str = "Hello! I'm your AI assistant. How can I help you today?";

/// Snapshot of one conversation, as seen by a presentation layer.
///
/// `messages` is append-only except for [`reset`](crate::ConversationStore::reset).
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState {
    pub(crate) messages: Vec<Message>,
    pub(crate) input: String,
    pub(crate) is_loading: bool,
    pub(crate) last_error: Option<String>,
}

impl ConversationState {
    /// A fresh conversation holding only the seed message.
    pub fn seeded() -> Self {
        Self {
            messages: vec![Message::assistant(SEED_MESSAGE)],
            input: String::new(),
            is_loading: false,
            last_error: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Contents of the input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while a completion request is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Description of the most recent failure, cleared on the next submission.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::seeded()
    }
}
