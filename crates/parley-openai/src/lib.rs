// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions provider for Parley.
//!
//! This crate implements [`CompletionProvider`] for the chat-completions
//! endpoint: one request per call, first candidate wins.

pub mod client;
pub mod types;

use async_trait::async_trait;
use parley_config::model::OpenAiConfig;
use parley_core::{ChatMessage, CompletionError, CompletionProvider, ParleyError};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, CompletionRequest};

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Chat-completions provider implementing [`CompletionProvider`].
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` config section and a resolved key.
    pub fn new(config: &OpenAiConfig, api_key: &SecretString) -> Result<Self, ParleyError> {
        let client = OpenAiClient::new(api_key, config.endpoint.clone())?;

        info!(
            model = config.model,
            endpoint = config.endpoint,
            "OpenAI provider initialized"
        );

        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Returns the model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the wire request for `history`, preserving order and roles.
    pub fn build_request(&self, history: &[ChatMessage]) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: history.iter().map(ApiMessage::from).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, history: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = self.build_request(history);
        debug!(messages = request.messages.len(), "sending completion request");

        let response = self.client.send(&request).await?;
        response
            .first_text()
            .map(str::to_owned)
            .ok_or(CompletionError::NoResponse)
    }
}

/// Resolves the API key from config or the `OPENAI_API_KEY` environment variable.
pub fn resolve_api_key(config_key: &Option<String>) -> Result<SecretString, ParleyError> {
    if let Some(key) = config_key {
        if !key.trim().is_empty() {
            return Ok(SecretString::from(key.trim().to_string()));
        }
    }

    match std::env::var(API_KEY_ENV_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(SecretString::from(key.trim().to_string())),
        _ => Err(ParleyError::Config(format!(
            "OpenAI API key not found. Set openai.api_key in config or {API_KEY_ENV_VAR} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Role;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_provider(endpoint: &str) -> OpenAiProvider {
        let config = OpenAiConfig {
            endpoint: endpoint.to_string(),
            ..OpenAiConfig::default()
        };
        OpenAiProvider::new(&config, &SecretString::from("sk-test".to_string())).unwrap()
    }

    #[test]
    fn request_preserves_order_and_roles() {
        let provider = test_provider("http://localhost/v1/chat/completions");
        let history = vec![
            ChatMessage::new(Role::User, "hi"),
            ChatMessage::new(Role::Assistant, "hello"),
        ];

        let request = provider.build_request(&history);
        assert_eq!(provider.model(), "gpt-3.5-turbo");
        assert_eq!(request.model, provider.model());
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(
            request.messages,
            vec![
                ApiMessage {
                    role: "user".into(),
                    content: "hi".into()
                },
                ApiMessage {
                    role: "assistant".into(),
                    content: "hello".into()
                },
            ]
        );
    }

    #[test]
    fn empty_history_builds_degenerate_request() {
        let provider = test_provider("http://localhost/v1/chat/completions");
        let request = provider.build_request(&[]);
        assert!(request.messages.is_empty());
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "4"}},
                    {"message": {"role": "assistant", "content": "four"}}
                ]
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let text = provider
            .complete(&[ChatMessage::new(Role::User, "2+2?")])
            .await
            .unwrap();
        assert_eq!(text, "4");
    }

    #[tokio::test]
    async fn complete_sends_full_history() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "assistant", "content": "Hello!"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.7,
                "max_tokens": 1000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "hey"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let history = [
            ChatMessage::new(Role::Assistant, "Hello!"),
            ChatMessage::new(Role::User, "hi"),
        ];
        assert_eq!(provider.complete(&history).await.unwrap(), "hey");
    }

    #[tokio::test]
    async fn empty_choices_is_no_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let err = provider.complete(&[]).await.unwrap_err();
        assert!(matches!(err, CompletionError::NoResponse), "got: {err:?}");
    }

    #[test]
    #[serial]
    fn configured_key_wins_over_env() {
        // SAFETY: test-only env mutation, serialized by #[serial].
        unsafe { std::env::set_var(API_KEY_ENV_VAR, "sk-from-env") };
        let key = resolve_api_key(&Some("sk-from-config".into()));
        unsafe { std::env::remove_var(API_KEY_ENV_VAR) };

        assert_eq!(key.unwrap().expose_secret(), "sk-from-config");
    }

    #[test]
    #[serial]
    fn env_key_is_used_when_config_is_blank() {
        unsafe { std::env::set_var(API_KEY_ENV_VAR, "sk-from-env") };
        let key = resolve_api_key(&Some("   ".into()));
        unsafe { std::env::remove_var(API_KEY_ENV_VAR) };

        assert_eq!(key.unwrap().expose_secret(), "sk-from-env");
    }

    #[test]
    #[serial]
    fn missing_key_is_config_error() {
        unsafe { std::env::remove_var(API_KEY_ENV_VAR) };
        let result = resolve_api_key(&None);
        assert!(matches!(result, Err(ParleyError::Config(_))));
    }
}
