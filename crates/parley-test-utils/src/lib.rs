// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley.
//!
//! Provides a scripted [`MockProvider`] for store-level tests and a
//! wiremock-backed completions endpoint for end-to-end tests.

pub mod mock_endpoint;
pub mod mock_provider;

pub use mock_endpoint::{COMPLETIONS_PATH, completion_body, completion_server, completions_url};
pub use mock_provider::{MockGate, MockProvider};
