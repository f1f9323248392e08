// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Parley.
//!
//! This crate provides the message types, the completion error taxonomy, and
//! the [`CompletionProvider`] trait that the conversation store drives and
//! provider crates implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, CompletionError, ParleyError};
pub use traits::CompletionProvider;
pub use types::{ChatMessage, Message, MessageId, Role, to_chat_messages};
