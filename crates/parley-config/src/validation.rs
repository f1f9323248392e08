// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the endpoint being an http(s) URL and the temperature range.

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

/// Prefix every OpenAI secret key carries.
pub const API_KEY_PREFIX: &str = "sk-";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.agent.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::invalid_value(
            "agent.log_level",
            format!(
                "`{}` is not one of {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if config.openai.model.trim().is_empty() {
        errors.push(ConfigError::invalid_value(
            "openai.model",
            "must not be empty",
        ));
    }

    if let Err(message) = validate_endpoint(&config.openai.endpoint) {
        errors.push(ConfigError::invalid_value("openai.endpoint", message));
    }

    let temperature = config.openai.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::invalid_value(
            "openai.temperature",
            format!("must be between 0 and 2, got {temperature}"),
        ));
    }

    if config.openai.max_tokens == 0 {
        errors.push(ConfigError::invalid_value(
            "openai.max_tokens",
            "must be greater than 0",
        ));
    }

    if let Some(key) = &config.openai.api_key {
        if let Err(e) = validate_api_key(key) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Loose credential format check: non-empty and starting with `sk-`.
///
/// This only catches obvious paste mistakes. The endpoint is the authority on
/// whether a key is valid.
pub fn validate_api_key(key: &str) -> Result<(), ConfigError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::invalid_api_key("API key must not be empty"));
    }
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(ConfigError::invalid_api_key(format!(
            "API keys start with `{API_KEY_PREFIX}`"
        )));
    }
    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<(), String> {
    let parsed = url::Url::parse(endpoint.trim())
        .map_err(|e| format!("`{endpoint}` is not a valid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("`{endpoint}` must use http or https, not `{other}`")),
    }
}
