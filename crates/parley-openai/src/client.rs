// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the chat-completions endpoint.
//!
//! Provides [`OpenAiClient`] which handles authentication, request encoding,
//! and classification of every outcome into a [`CompletionError`]. One call
//! is one POST: no retries, no timeout beyond the transport default.

use parley_core::{CompletionError, ParleyError};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, CompletionRequest, CompletionResponse};

/// HTTP client for chat-completions communication.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a new client that authenticates with `api_key`.
    ///
    /// The endpoint is parsed when a request is issued, so a bad endpoint
    /// surfaces as [`CompletionError::InvalidUrl`] on the first call.
    pub fn new(api_key: &SecretString, endpoint: impl Into<String>) -> Result<Self, ParleyError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| ParleyError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ParleyError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Sends `request` and decodes the response body.
    ///
    /// Any status other than 200 is [`CompletionError::Http`] regardless of
    /// the body. A 200 whose body does not decode is
    /// [`CompletionError::InvalidResponse`].
    pub async fn send(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let url = parse_endpoint(&self.endpoint)?;
        let body = serde_json::to_vec(request).map_err(CompletionError::encoding)?;

        let response = self
            .client
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(CompletionError::network)?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => warn!(
                    status = status.as_u16(),
                    kind = api_err.error.type_.as_deref().unwrap_or("unknown"),
                    message = %api_err.error.message,
                    "completion endpoint returned an error"
                ),
                Err(_) => warn!(status = status.as_u16(), "completion endpoint returned an error"),
            }
            return Err(CompletionError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(CompletionError::network)?;
        serde_json::from_slice(&bytes).map_err(CompletionError::invalid_response)
    }
}

/// Parses the endpoint, accepting only http and https.
fn parse_endpoint(endpoint: &str) -> Result<reqwest::Url, CompletionError> {
    let url = reqwest::Url::parse(endpoint.trim()).map_err(|_| CompletionError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(CompletionError::InvalidUrl),
    }
}
