// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `llmux shell` command implementation.
//!
//! Launches an interactive REPL with colored prompt and readline history.
//! Creates a new session per invocation; every line goes through the full
//! routing pipeline. A leading `@provider ` pins that backend for the
//! message (try-first, with automatic fallback behind it).

use colored::Colorize;
use llmux_config::LlmuxConfig;
use llmux_core::error::LlmuxError;
use llmux_core::types::{ProviderId, Request};
use llmux_router::Router;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::setup;

/// Parses a per-message provider override prefix from user input.
///
/// `@azure what changed today` pins the azure backend for this message.
/// Returns `(Some(provider), rest)` when a prefix is present, with the
/// prefix stripped from the returned text.
pub fn parse_provider_override(text: &str) -> (Option<ProviderId>, &str) {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix('@')
        && let Some((name, message)) = rest.split_once(' ')
        && !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return (Some(ProviderId::new(name)), message.trim_start());
    }
    (None, text)
}

/// Runs the `llmux shell` interactive REPL.
pub async fn run_shell(config: LlmuxConfig) -> Result<(), LlmuxError> {
    let router = setup::build_router(&config)?;
    let session_id = uuid::Uuid::new_v4().to_string();

    let mut rl = DefaultEditor::new()
        .map_err(|e| LlmuxError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "llmux shell".bold().green());
    println!(
        "Type {} to exit, prefix with {} to pin a backend.\n",
        "/quit".yellow(),
        "@provider".yellow()
    );

    let prompt = format!("{}> ", "llmux".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Err(e) = handle_line(&router, &session_id, trimmed).await {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    let turns = router.store().message_count(&session_id);
    if turns > 0 {
        println!("{}", format!("session messages: {turns}").dimmed());
    }
    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle_line(router: &Router, session_id: &str, input: &str) -> Result<(), LlmuxError> {
    let (explicit, text) = parse_provider_override(input);
    debug!(session_id, pinned = explicit.is_some(), "shell line");

    let mut request = Request::new(text, session_id);
    if let Some(provider) = explicit {
        request = request.with_provider(provider);
    }

    let response = router.handle(request).await?;

    println!("{}", response.text);
    let mut meta = format!(
        "[{} after {} attempt{}]",
        response.provider_used,
        response.attempts,
        if response.attempts == 1 { "" } else { "s" }
    );
    if response.degraded {
        meta.push_str(" [degraded]");
    }
    println!("{}", meta.dimmed());
    Ok(())
}
