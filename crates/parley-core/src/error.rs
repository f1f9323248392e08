// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Parley.
//!
//! [`CompletionError`] is the closed set of ways a single completion request
//! can fail. Every variant is terminal for that request; none are retried.
//! Its `Display` output is the human-readable text a front end shows to the
//! user. [`ParleyError`] covers everything around it (configuration, setup).

use thiserror::Error;

/// Boxed error source carried by transport and decode failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single completion request.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The completions endpoint is not a usable http(s) URL.
    #[error("Invalid URL")]
    InvalidUrl,

    /// The request could not be serialized. Indicates a local bug.
    #[error("Failed to encode request")]
    Encoding {
        #[source]
        source: BoxError,
    },

    /// The endpoint answered 200 but the body was not a completion response.
    #[error("Invalid response from server")]
    InvalidResponse {
        #[source]
        source: Option<BoxError>,
    },

    /// The endpoint answered with a status other than 200.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// The response parsed but carried no choices.
    #[error("No response from API")]
    NoResponse,

    /// DNS, connect, reset, or transport timeout.
    #[error("Network error: {source}")]
    Network {
        #[source]
        source: BoxError,
    },
}

impl CompletionError {
    /// Wraps a transport failure.
    pub fn network(source: impl Into<BoxError>) -> Self {
        Self::Network {
            source: source.into(),
        }
    }

    /// Wraps a body that failed to decode.
    pub fn invalid_response(source: impl Into<BoxError>) -> Self {
        Self::InvalidResponse {
            source: Some(source.into()),
        }
    }

    /// Wraps a serialization failure.
    pub fn encoding(source: impl Into<BoxError>) -> Self {
        Self::Encoding {
            source: source.into(),
        }
    }

    /// Status code for [`CompletionError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// The primary error type for setup and framework-level operations.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (missing credential, bad header value, bad endpoint).
    #[error("configuration error: {0}")]
    Config(String),

    /// A completion request failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
