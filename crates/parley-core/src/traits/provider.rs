// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for chat-completion endpoints.

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::types::ChatMessage;

/// A backend that turns a conversation history into one assistant reply.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Returns the human-readable name of this provider.
    fn name(&self) -> &str;

    /// Sends `history` in order and returns the text of the first candidate.
    async fn complete(&self, history: &[ChatMessage]) -> Result<String, CompletionError>;
}
