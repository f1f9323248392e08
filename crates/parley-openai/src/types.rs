// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completions request/response wire types.

use parley_core::ChatMessage;
use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to the chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,

    /// Conversation messages, oldest first.
    pub messages: Vec<ApiMessage>,

    /// Sampling temperature, 0.0 to 2.0.
    pub temperature: f32,

    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// A single message in the chat-completions format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Role: "user" or "assistant".
    pub role: String,

    /// Plain text content.
    pub content: String,
}

impl From<&ChatMessage> for ApiMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.to_string(),
            content: message.content.clone(),
        }
    }
}

// --- Response types ---

/// A full response from the chat-completions endpoint.
///
/// Only the fields Parley reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    /// Candidate completions. Only the first is used.
    pub choices: Vec<Choice>,
}

impl CompletionResponse {
    /// Text of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One candidate completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

/// The message inside a candidate.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

// --- Error types ---

/// Error body returned alongside non-200 statuses. Used for logging only.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Details within an API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Role;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = CompletionRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![ApiMessage::from(&ChatMessage::new(Role::User, "hi"))],
            temperature: 0.7,
            max_tokens: 1000,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
        assert_eq!(value["max_tokens"], 1000);
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn response_ignores_unknown_fields() {
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "4"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "four"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        });

        let response: CompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.choices.len(), 2);
        assert_eq!(response.first_text(), Some("4"));
    }

    #[test]
    fn empty_choices_have_no_text() {
        let response: CompletionResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn missing_content_fails_to_decode() {
        let body = serde_json::json!({"choices": [{"message": {"role": "assistant"}}]});
        assert!(serde_json::from_value::<CompletionResponse>(body).is_err());
    }

    #[test]
    fn api_error_body_parses() {
        let body = serde_json::json!({
            "error": {"message": "Rate limit reached", "type": "requests", "code": null}
        });
        let parsed: ApiErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.error.type_.as_deref(), Some("requests"));
        assert_eq!(parsed.error.message, "Rate limit reached");
    }
}
