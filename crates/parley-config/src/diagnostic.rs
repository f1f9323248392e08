// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Every problem found while loading `parley.toml` becomes a [`ConfigError`],
//! a miette diagnostic that points at the offending key in the file it came
//! from. Unknown keys carry a "did you mean" suggestion ranked by
//! Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// Catches typos like `modle` -> `model` and `max_token` -> `max_tokens`.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Source name used for configuration given as a string rather than a file.
pub const INLINE_SOURCE: &str = "<inline>";

/// Dotted path of the credential key, used to locate it in source files.
const API_KEY_PATH: &str = "openai.api_key";

/// A TOML source as `(display name, content)`.
pub type TomlSource = (String, String);

/// A configuration problem, optionally anchored to a key in a source file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section of `parley.toml` defines.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(parley::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if one is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value whose TOML type does not match the field.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(parley::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `openai.max_tokens`.
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A well-typed value outside what Parley accepts.
    #[error("invalid value for `{key}`: {message}")]
    #[diagnostic(code(parley::config::invalid_value))]
    Validation {
        /// Dotted path, e.g. `openai.endpoint`.
        key: String,
        message: String,
        #[label("rejected value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// The configured or entered API key fails the format check.
    #[error("invalid API key: {reason}")]
    #[diagnostic(
        code(parley::config::api_key),
        help("set openai.api_key in parley.toml or export OPENAI_API_KEY")
    )]
    InvalidApiKey {
        reason: String,
        #[label("this key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(parley::config::other))]
    Other(String),
}

impl ConfigError {
    /// A validation failure for `key` with no location yet.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
            span: None,
            src: None,
        }
    }

    /// A rejected API key with no location yet.
    pub fn invalid_api_key(reason: impl Into<String>) -> Self {
        Self::InvalidApiKey {
            reason: reason.into(),
            span: None,
            src: None,
        }
    }

    /// Returns the label span, if the error has been located in a source.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Self::UnknownKey { span, .. }
            | Self::InvalidType { span, .. }
            | Self::Validation { span, .. }
            | Self::InvalidApiKey { span, .. } => *span,
            Self::Other(_) => None,
        }
    }

    /// Anchors a validation error to the key it names.
    ///
    /// `sources` are ordered lowest priority first, so the last source that
    /// sets the key is the one whose value was used.
    pub fn locate(self, sources: &[TomlSource]) -> Self {
        match self {
            Self::Validation {
                key,
                message,
                span: None,
                ..
            } => {
                let (span, src) = locate_dotted(&key, sources);
                Self::Validation {
                    key,
                    message,
                    span,
                    src,
                }
            }
            Self::InvalidApiKey {
                reason, span: None, ..
            } => {
                let (span, src) = locate_dotted(API_KEY_PATH, sources);
                Self::InvalidApiKey { reason, span, src }
            }
            other => other,
        }
    }
}

/// Format the help message for unknown key errors.
fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into one `ConfigError` per underlying failure.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[TomlSource],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                // For unknown fields the path names the enclosing section.
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, &path, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                // For type errors the path ends with the field itself.
                Kind::InvalidType(actual, expected) => {
                    let (span, src) = match path.split_last() {
                        Some((field, section)) => locate(&error, section, field, toml_sources),
                        None => (None, None),
                    };
                    ConfigError::InvalidType {
                        key: path.join("."),
                        detail: format!("found {actual}, expected {expected}"),
                        expected: expected.to_string(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Finds `field` under `section` in the source the error came from.
///
/// Merged tables keep the tag of the compiled defaults, so an error that is
/// not attributed to a file falls back to searching every source, highest
/// priority first.
fn locate(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[TomlSource],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let attributed = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => {
            let path = path.display().to_string();
            toml_sources.iter().find(|(name, _)| *name == path)
        }
        _ => None,
    };

    attributed
        .and_then(|source| span_in(source, section, field))
        .or_else(|| search(section, field, toml_sources))
        .map_or((None, None), |(span, src)| (Some(span), Some(src)))
}

/// Finds a dotted key in the highest-priority source that sets it.
fn locate_dotted(
    dotted: &str,
    toml_sources: &[TomlSource],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let mut parts: Vec<String> = dotted.split('.').map(str::to_string).collect();
    let Some(field) = parts.pop() else {
        return (None, None);
    };

    search(&parts, &field, toml_sources)
        .map_or((None, None), |(span, src)| (Some(span), Some(src)))
}

/// Searches sources from highest to lowest priority.
fn search(
    section: &[String],
    field: &str,
    toml_sources: &[TomlSource],
) -> Option<(SourceSpan, NamedSource<String>)> {
    toml_sources
        .iter()
        .rev()
        .find_map(|source| span_in(source, section, field))
}

fn span_in(
    (name, content): &TomlSource,
    section: &[String],
    field: &str,
) -> Option<(SourceSpan, NamedSource<String>)> {
    let offset = find_key_offset(content, section, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field` inside the `[section]` table of `content`.
///
/// An empty `path` searches the top-level table. The scan stops at the next
/// table header, so a key of the same name in a later section is not matched.
/// Both `\n` and `\r\n` line endings are handled.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let mut in_section = path.is_empty();
    let header = format!("[{}]", path.join("."));
    let mut offset = 0;

    for raw in content.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim_start();

        if trimmed.starts_with('[') {
            let is_target = !path.is_empty() && trimmed.trim_end() == header;
            if in_section && !is_target {
                return None;
            }
            in_section = is_target;
        } else if in_section {
            if let Some(after) = trimmed.strip_prefix(field) {
                if after.starts_with([' ', '\t', '=']) {
                    return Some(offset + (line.len() - trimmed.len()));
                }
            }
        }

        offset += raw.len();
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
///
/// Returns the best match above the similarity threshold, or `None` if
/// no valid key is close enough to the unknown key.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
