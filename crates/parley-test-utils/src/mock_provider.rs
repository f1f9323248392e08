// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! outcomes, enabling fast, CI-runnable tests without external API calls.
//! A gated provider parks every call until the test releases it, which
//! makes the in-flight window observable.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use parley_core::{ChatMessage, CompletionError, CompletionProvider};

/// A mock provider that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    gate: Option<MockGate>,
}

impl MockProvider {
    /// Create a new mock provider with an empty queue.
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// Create a mock provider pre-loaded with successful replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_outcomes(responses.into_iter().map(Ok).collect())
    }

    /// Create a mock provider pre-loaded with arbitrary outcomes.
    pub fn with_outcomes(outcomes: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            calls: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Parks every call until [`MockGate::release`] is called.
    pub fn gated(mut self) -> (Self, MockGate) {
        let gate = MockGate::new();
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Add a successful reply to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(text.into()));
    }

    /// Add a failure to the end of the queue.
    pub async fn add_error(&self, error: CompletionError) {
        self.outcomes.lock().await.push_back(Err(error));
    }

    /// Histories received so far, one entry per call.
    pub async fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().await.clone()
    }

    async fn next_outcome(&self) -> Result<String, CompletionError> {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn complete(&self, history: &[ChatMessage]) -> Result<String, CompletionError> {
        self.calls.lock().await.push(history.to_vec());
        if let Some(gate) = &self.gate {
            gate.enter().await;
        }
        self.next_outcome().await
    }
}

/// Handle controlling a gated [`MockProvider`].
///
/// Both sides are counted: each call adds one "started" permit and consumes
/// one "release" permit.
#[derive(Clone)]
pub struct MockGate {
    started: Arc<Semaphore>,
    released: Arc<Semaphore>,
}

impl MockGate {
    fn new() -> Self {
        Self {
            started: Arc::new(Semaphore::new(0)),
            released: Arc::new(Semaphore::new(0)),
        }
    }

    async fn enter(&self) {
        self.started.add_permits(1);
        if let Ok(permit) = self.released.acquire().await {
            permit.forget();
        }
    }

    /// Waits until one more call has reached the provider.
    pub async fn wait_started(&self) {
        if let Ok(permit) = self.started.acquire().await {
            permit.forget();
        }
    }

    /// Lets one parked (or future) call complete.
    pub fn release(&self) {
        self.released.add_permits(1);
    }
}
