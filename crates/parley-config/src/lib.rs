// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Parley.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and Elm-style diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use parley_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("model: {}", config.openai.model);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, INLINE_SOURCE, TomlSource, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ParleyConfig;
pub use validation::validate_api_key;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Deserialization failures become diagnostics with typo suggestions; semantic
/// failures are anchored to the key in whichever file set it.
pub fn load_and_validate() -> Result<ParleyConfig, Vec<ConfigError>> {
    validated(loader::load_config(), collect_toml_sources())
}

/// Load configuration from a specific TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ParleyConfig, Vec<ConfigError>> {
    let sources = vec![(INLINE_SOURCE.to_string(), toml_content.to_string())];
    validated(loader::load_config_from_str(toml_content), sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<ParleyConfig, Vec<ConfigError>> {
    let sources = std::fs::read_to_string(path)
        .map(|content| vec![(path.display().to_string(), content)])
        .unwrap_or_default();
    validated(loader::load_config_from_path(path), sources)
}

/// Runs semantic validation, anchoring every error in `sources`.
fn validated(
    loaded: Result<ParleyConfig, figment::Error>,
    sources: Vec<TomlSource>,
) -> Result<ParleyConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources))?;
    validation::validate_config(&config).map_err(|errors| {
        errors
            .into_iter()
            .map(|error| error.locate(&sources))
            .collect::<Vec<_>>()
    })?;
    Ok(config)
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<TomlSource> {
    loader::config_file_paths()
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let display = if path.is_relative() {
                std::env::current_dir()
                    .map(|d| d.join(&path).display().to_string())
                    .unwrap_or_else(|_| path.display().to_string())
            } else {
                path.display().to_string()
            };
            Some((display, content))
        })
        .collect()
}
