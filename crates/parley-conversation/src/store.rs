// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store: the single owner of a conversation's state.
//!
//! A store moves through `Idle -> Loading -> Idle` once per accepted
//! submission. Every mutation goes through the `watch` sender, which
//! serializes writers and notifies subscribers. A submission that arrives
//! while another is in flight is rejected rather than queued.

use std::sync::Arc;

use parley_core::{CompletionError, CompletionProvider, Message, to_chat_messages};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::state::{ConversationState, SEED_MESSAGE};

/// Phase of the store's submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to accept a submission.
    Idle,
    /// A completion request is in flight.
    Loading,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
        }
    }
}

/// What happened to a call to [`ConversationStore::submit`].
#[derive(Debug)]
pub enum Submission {
    /// The text was blank; nothing changed.
    Ignored,
    /// Another request was in flight; nothing changed.
    Busy,
    /// The assistant reply was appended.
    Replied,
    /// The request failed; the description is in `last_error`.
    Failed(CompletionError),
}

/// Owns the message list, input buffer, loading flag, and last error.
pub struct ConversationStore {
    provider: Arc<dyn CompletionProvider>,
    state: watch::Sender<ConversationState>,
}

impl ConversationStore {
    /// Creates a store holding only the seed message.
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        let (state, _) = watch::channel(ConversationState::seeded());
        Self { provider, state }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages.clone()
    }

    pub fn input(&self) -> String {
        self.state.borrow().input.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading() {
            Phase::Loading
        } else {
            Phase::Idle
        }
    }

    /// Replaces the input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|state| {
            if state.input == text {
                return false;
            }
            state.input = text;
            true
        });
    }

    /// Submits whatever is in the input buffer.
    pub async fn submit_input(&self) -> Submission {
        let text = self.input();
        self.submit(&text).await
    }

    /// Appends `text` as a user message and asks the provider for a reply.
    ///
    /// The text is stored verbatim; it is only trimmed to decide whether it
    /// is blank. The loading flag is cleared when the request settles, even
    /// if this future is dropped first.
    pub async fn submit(&self, text: &str) -> Submission {
        if text.trim().is_empty() {
            debug!("ignoring blank submission");
            return Submission::Ignored;
        }

        let mut history = None;
        self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.messages.push(Message::user(text));
            state.input.clear();
            state.is_loading = true;
            state.last_error = None;
            history = Some(to_chat_messages(&state.messages));
            true
        });

        let Some(history) = history else {
            warn!("rejecting submission while a request is in flight");
            return Submission::Busy;
        };

        info!(
            provider = self.provider.name(),
            messages = history.len(),
            "requesting completion"
        );
        let guard = LoadingGuard::new(&self.state);

        match self.provider.complete(&history).await {
            Ok(reply) => {
                debug!(chars = reply.len(), "completion received");
                guard.settle(|state| state.messages.push(Message::assistant(reply)));
                Submission::Replied
            }
            Err(err) => {
                warn!(error = %err, "completion failed");
                let description = err.to_string();
                guard.settle(|state| state.last_error = Some(description));
                Submission::Failed(err)
            }
        }
    }

    /// Drops the history back to the seed message and clears the last error.
    ///
    /// The loading flag is left alone.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.messages = vec![Message::assistant(SEED_MESSAGE)];
            state.last_error = None;
        });
        info!("conversation reset");
    }
}

/// Clears `is_loading` exactly once, on settle or on drop.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<ConversationState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<ConversationState>) -> Self {
        Self { state, armed: true }
    }

    /// Applies the outcome and leaves `Loading` in one notification.
    fn settle(mut self, apply: impl FnOnce(&mut ConversationState)) {
        self.armed = false;
        self.state.send_modify(|state| {
            apply(state);
            state.is_loading = false;
        });
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|state| state.is_loading = false);
        }
    }
}
