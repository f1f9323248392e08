// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley shell` command implementation.
//!
//! Launches an interactive REPL with colored prompt and readline history.
//! Each line is handed to the conversation store; the reply or the store's
//! last error is printed once the request settles.

use std::sync::Arc;

use colored::Colorize;
use parley_config::model::ParleyConfig;
use parley_conversation::{ConversationStore, Submission};
use parley_core::{Message, ParleyError};
use parley_openai::{API_KEY_ENV_VAR, OpenAiProvider};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

/// A line of shell input, classified.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    Clear,
    History,
    Help,
    Unknown(&'a str),
    Message(&'a str),
}

impl<'a> ShellCommand<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "/quit" | "/exit" => Self::Quit,
            "/clear" => Self::Clear,
            "/history" => Self::History,
            "/help" => Self::Help,
            cmd if cmd.starts_with('/') && !cmd.contains(char::is_whitespace) => {
                Self::Unknown(cmd)
            }
            _ => Self::Message(line),
        }
    }
}

/// Runs the `parley shell` interactive REPL.
pub async fn run_shell(config: ParleyConfig) -> Result<(), ParleyError> {
    let api_key = resolve_key(&config)?;
    let provider = OpenAiProvider::new(&config.openai, &api_key)?;
    let banner = format!("parley shell ({})", provider.model());
    let store = ConversationStore::new(Arc::new(provider));

    let mut rl = DefaultEditor::new()
        .map_err(|e| ParleyError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", banner.bold().green());
    println!(
        "Type {} to exit, {} to start over, {} for commands.\n",
        "/quit".yellow(),
        "/clear".yellow(),
        "/help".yellow()
    );
    for message in store.messages() {
        print_message(&message);
    }

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => match ShellCommand::parse(&line) {
                ShellCommand::Quit => break,
                ShellCommand::Clear => {
                    store.reset();
                    println!("{}", "conversation cleared".dimmed());
                    for message in store.messages() {
                        print_message(&message);
                    }
                }
                ShellCommand::History => {
                    for message in store.messages() {
                        print_message(&message);
                    }
                }
                ShellCommand::Help => print_help(),
                ShellCommand::Unknown(cmd) => {
                    eprintln!("{}: unknown command {cmd}, try /help", "error".red());
                }
                ShellCommand::Message(text) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(text);
                    store.set_input(text);
                    send(&store).await;
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Submits the input buffer and prints the outcome.
async fn send(store: &ConversationStore) {
    eprint!("{}", "thinking...\r".dimmed());
    let outcome = store.submit_input().await;
    eprint!("           \r");

    match outcome {
        Submission::Replied => {
            if let Some(reply) = store.messages().last() {
                print_message(reply);
            }
        }
        Submission::Failed(_) => {
            let description = store.last_error().unwrap_or_default();
            eprintln!("{}: {description}", "error".red());
        }
        Submission::Busy => {
            eprintln!("{}", "still waiting for the previous reply".yellow());
        }
        Submission::Ignored => debug!("blank input ignored"),
    }
}

fn print_message(message: &Message) {
    let label = if message.is_user() {
        "you".green()
    } else {
        "assistant".cyan()
    };
    let time = message.timestamp().format("%H:%M");
    println!("{} {label}: {}", time.to_string().dimmed(), message.content());
}

fn print_help() {
    println!("  {}   show the conversation so far", "/history".yellow());
    println!("  {}     start a new conversation", "/clear".yellow());
    println!("  {}      leave the shell (also /exit)", "/quit".yellow());
}

/// Finds the API key: config, then `OPENAI_API_KEY`, then a hidden prompt.
fn resolve_key(config: &ParleyConfig) -> Result<SecretString, ParleyError> {
    let key = match parley_openai::resolve_api_key(&config.openai.api_key) {
        Ok(key) => key,
        Err(e) if std::io::IsTerminal::is_terminal(&std::io::stdin()) => {
            debug!(error = %e, "no stored API key, prompting");
            prompt_for_key()?
        }
        Err(e) => {
            eprintln!(
                "error: API key required. Set openai.api_key in parley.toml, export {API_KEY_ENV_VAR}, or run interactively."
            );
            return Err(e);
        }
    };

    if let Err(e) = parley_config::validate_api_key(key.expose_secret()) {
        parley_config::render_errors(&[e]);
        return Err(ParleyError::Config("API key rejected".to_string()));
    }

    info!("API key resolved");
    Ok(key)
}

fn prompt_for_key() -> Result<SecretString, ParleyError> {
    eprint!("OpenAI API key: ");
    let key = rpassword::read_password()
        .map_err(|e| ParleyError::Config(format!("failed to read API key: {e}")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParleyError::Config("empty API key not allowed".to_string()));
    }
    Ok(SecretString::from(key.to_string()))
}
