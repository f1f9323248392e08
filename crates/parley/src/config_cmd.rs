// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley config` subcommands.

use colored::Colorize;
use parley_config::ParleyConfig;
use parley_core::ParleyError;
use parley_openai::API_KEY_ENV_VAR;

/// Where the API key will come from when the shell starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Config,
    Environment,
    Prompt,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Config => write!(f, "config file (openai.api_key)"),
            KeySource::Environment => write!(f, "{API_KEY_ENV_VAR} environment variable"),
            KeySource::Prompt => write!(f, "interactive prompt"),
        }
    }
}

/// Reports which source supplies the key, without reading it interactively.
pub fn key_source(config: &ParleyConfig, env_key: Option<&str>) -> KeySource {
    let present = |k: &str| !k.trim().is_empty();
    if config.openai.api_key.as_deref().is_some_and(present) {
        KeySource::Config
    } else if env_key.is_some_and(present) {
        KeySource::Environment
    } else {
        KeySource::Prompt
    }
}

/// Runs `parley config check`. Loading already validated the file.
pub fn run_check(config: &ParleyConfig) -> Result<(), ParleyError> {
    let env_key = std::env::var(API_KEY_ENV_VAR).ok();
    let source = key_source(config, env_key.as_deref());

    println!("{} configuration is valid", "ok".green().bold());
    println!("  model:    {}", config.openai.model);
    println!("  endpoint: {}", config.openai.endpoint);
    println!("  api key:  {source}");

    if source == KeySource::Environment {
        if let Some(key) = env_key.as_deref() {
            if let Err(e) = parley_config::validate_api_key(key) {
                parley_config::render_errors(&[e]);
                return Err(ParleyError::Config(format!(
                    "{API_KEY_ENV_VAR} does not look like an API key"
                )));
            }
        }
    }
    Ok(())
}

/// Runs `parley config show`.
pub fn run_show(config: &ParleyConfig) -> Result<(), ParleyError> {
    print!("{}", render_redacted(config)?);
    Ok(())
}

fn render_redacted(config: &ParleyConfig) -> Result<String, ParleyError> {
    toml::to_string_pretty(&config.redacted())
        .map_err(|e| ParleyError::Internal(format!("failed to render config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> ParleyConfig {
        let mut config = ParleyConfig::default();
        config.openai.api_key = key.map(str::to_string);
        config
    }

    #[test]
    fn configured_key_takes_precedence() {
        let config = config_with_key(Some("sk-config"));
        assert_eq!(key_source(&config, Some("sk-env")), KeySource::Config);
    }

    #[test]
    fn blank_config_key_falls_through_to_env() {
        let config = config_with_key(Some("  "));
        assert_eq!(key_source(&config, Some("sk-env")), KeySource::Environment);
    }

    #[test]
    fn no_key_anywhere_means_prompt() {
        let config = config_with_key(None);
        assert_eq!(key_source(&config, None), KeySource::Prompt);
        assert_eq!(key_source(&config, Some("")), KeySource::Prompt);
    }

    #[test]
    fn show_never_prints_the_key() {
        let rendered = render_redacted(&config_with_key(Some("sk-very-secret"))).unwrap();
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("gpt-3.5-turbo"));
    }
}
