// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state for Parley.
//!
//! [`ConversationStore`] owns one conversation: the ordered message list,
//! the input buffer, the loading flag, and the last error. It hands the
//! history to a [`CompletionProvider`](parley_core::CompletionProvider) and
//! folds the outcome back into state. Presentation layers observe it through
//! [`ConversationStore::subscribe`].

pub mod state;
pub mod store;

pub use state::{ConversationState, SEED_MESSAGE};
pub use store::{ConversationStore, Phase, Submission};
