// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned chat-completions endpoint backed by wiremock.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock endpoint answers on.
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// A 200 body with a single choice carrying `content`.
pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
}

/// Starts a server answering every completions POST with `status` and `body`.
pub async fn completion_server(status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Full completions URL on `server`.
pub fn completions_url(server: &MockServer) -> String {
    format!("{}{COMPLETIONS_PATH}", server.uri())
}
