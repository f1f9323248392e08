// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seam between the conversation store and providers.

pub mod provider;

pub use provider::CompletionProvider;
