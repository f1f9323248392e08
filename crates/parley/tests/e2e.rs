// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Parley pipeline.
//!
//! Each test wires a real `OpenAiProvider` into a `ConversationStore` and
//! points it at an isolated wiremock endpoint. Tests are independent and
//! order-insensitive.

use std::sync::Arc;

use parley_config::model::OpenAiConfig;
use parley_conversation::{ConversationStore, SEED_MESSAGE, Submission};
use parley_core::CompletionError;
use parley_openai::OpenAiProvider;
use parley_test_utils::{completion_body, completion_server, completions_url};
use secrecy::SecretString;
use wiremock::MockServer;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, ResponseTemplate};

fn store_for(endpoint: String) -> ConversationStore {
    let config = OpenAiConfig {
        endpoint,
        ..OpenAiConfig::default()
    };
    let key = SecretString::from("sk-e2e-test".to_string());
    let provider = OpenAiProvider::new(&config, &key).unwrap();
    ConversationStore::new(Arc::new(provider))
}

fn transcript(store: &ConversationStore) -> Vec<(bool, String)> {
    store
        .messages()
        .iter()
        .map(|m| (m.is_user(), m.content().to_string()))
        .collect()
}

// ---- Successful exchange ----

#[tokio::test]
async fn reply_is_appended_after_user_message() {
    let server = completion_server(200, completion_body("4")).await;
    let store = store_for(completions_url(&server));

    let outcome = store.submit("2+2?").await;

    assert!(matches!(outcome, Submission::Replied));
    assert_eq!(
        transcript(&store),
        vec![
            (false, SEED_MESSAGE.to_string()),
            (true, "2+2?".to_string()),
            (false, "4".to_string()),
        ]
    );
    assert!(!store.is_loading());
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn request_carries_credentials_and_whole_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sk-e2e-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "assistant", "content": SEED_MESSAGE},
                {"role": "user", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi!")))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(server.uri());
    assert!(matches!(store.submit("hello").await, Submission::Replied));
}

// ---- Failures land in last_error ----

#[tokio::test]
async fn server_error_keeps_user_message_and_sets_error() {
    let server = completion_server(500, serde_json::json!({"error": {"message": "boom"}})).await;
    let store = store_for(completions_url(&server));

    let outcome = store.submit("2+2?").await;

    assert!(matches!(
        outcome,
        Submission::Failed(CompletionError::Http { status: 500 })
    ));
    assert_eq!(
        transcript(&store),
        vec![
            (false, SEED_MESSAGE.to_string()),
            (true, "2+2?".to_string()),
        ]
    );
    assert_eq!(store.last_error().as_deref(), Some("HTTP error: 500"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn empty_choices_surface_as_no_response() {
    let server = completion_server(200, serde_json::json!({"choices": []})).await;
    let store = store_for(completions_url(&server));

    store.submit("anyone there?").await;

    assert_eq!(store.last_error().as_deref(), Some("No response from API"));
    assert_eq!(store.messages().len(), 2);
}

#[tokio::test]
async fn garbage_body_surfaces_as_invalid_response() {
    let server = completion_server(200, serde_json::json!({"unexpected": true})).await;
    let store = store_for(completions_url(&server));

    store.submit("hi").await;

    assert_eq!(
        store.last_error().as_deref(),
        Some("Invalid response from server")
    );
}

#[tokio::test]
async fn bad_endpoint_surfaces_as_invalid_url() {
    let store = store_for("not a url".to_string());

    store.submit("hi").await;

    assert_eq!(store.last_error().as_deref(), Some("Invalid URL"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn unreachable_endpoint_surfaces_as_network_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let store = store_for(format!("http://127.0.0.1:{port}/v1/chat/completions"));

    let outcome = store.submit("hello?").await;

    assert!(matches!(
        outcome,
        Submission::Failed(CompletionError::Network { .. })
    ));
    let error = store.last_error().unwrap_or_default();
    assert!(error.starts_with("Network error: "), "got: {error}");
    assert_eq!(
        transcript(&store),
        vec![
            (false, SEED_MESSAGE.to_string()),
            (true, "hello?".to_string()),
        ]
    );
    assert!(!store.is_loading());
}

// ---- Recovery ----

#[tokio::test]
async fn failure_then_success_clears_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("recovered")))
        .mount(&server)
        .await;

    let store = store_for(server.uri());

    store.submit("first").await;
    assert_eq!(store.last_error().as_deref(), Some("HTTP error: 503"));

    store.submit("second").await;
    assert!(store.last_error().is_none());
    assert_eq!(
        transcript(&store).last(),
        Some(&(false, "recovered".to_string()))
    );
    assert_eq!(store.messages().len(), 4);
}

#[tokio::test]
async fn reset_sends_only_seed_with_next_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "messages": [
                {"role": "assistant", "content": SEED_MESSAGE},
                {"role": "user", "content": "fresh start"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("welcome back")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .mount(&server)
        .await;

    let store = store_for(server.uri());
    store.submit("old topic").await;
    store.reset();

    store.submit("fresh start").await;
    assert_eq!(
        transcript(&store),
        vec![
            (false, SEED_MESSAGE.to_string()),
            (true, "fresh start".to_string()),
            (false, "welcome back".to_string()),
        ]
    );
}
