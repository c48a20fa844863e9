// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Llmux - a multi-provider AI request router.
//!
//! This is the binary entry point: it loads and validates configuration,
//! initializes logging, and dispatches to the subcommands.

use clap::{Parser, Subcommand};
use colored::Colorize;
use llmux_config::LlmuxConfig;
use llmux_core::error::LlmuxError;
use llmux_core::types::{ProviderId, Request, Tier};
use tracing_subscriber::EnvFilter;

mod setup;
mod shell;
mod status;

/// Llmux - a multi-provider AI request router.
#[derive(Parser, Debug)]
#[command(name = "llmux", version, about, long_about = None)]
struct Cli {
    /// Path to a specific config file (bypasses the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive REPL session.
    Shell,
    /// Route a single request and print the answer.
    Ask {
        /// The request text.
        text: String,
        /// Session id to thread conversation state through.
        #[arg(long, default_value = "cli")]
        session: String,
        /// Pin a provider (try-first, with fallback behind it).
        #[arg(long)]
        provider: Option<String>,
        /// Pin a complexity tier (low, medium, high).
        #[arg(long)]
        tier: Option<Tier>,
    },
    /// Show configuration and provider health.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            for error in errors {
                eprintln!("{}: {error}", "config error".red());
            }
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let result = match cli.command {
        Some(Commands::Shell) | None => shell::run_shell(config).await,
        Some(Commands::Ask { text, session, provider, tier }) => {
            run_ask(config, text, session, provider, tier).await
        }
        Some(Commands::Status) => status::run_status(&config),
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<LlmuxConfig, Vec<String>> {
    let loaded = match path {
        Some(path) => llmux_config::load_config_from_path(path),
        None => llmux_config::load_config(),
    };
    let config = loaded.map_err(|e| vec![e.to_string()])?;
    llmux_config::validate_config(&config)?;
    Ok(config)
}

fn init_tracing(config: &LlmuxConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_ask(
    config: LlmuxConfig,
    text: String,
    session: String,
    provider: Option<String>,
    tier: Option<Tier>,
) -> Result<(), LlmuxError> {
    let router = setup::build_router(&config)?;

    let mut request = Request::new(text, session);
    if let Some(provider) = provider {
        request = request.with_provider(ProviderId::new(provider));
    }
    if let Some(tier) = tier {
        request = request.with_tier(tier);
    }

    let response = router.handle(request).await?;
    println!("{}", response.text);
    if response.degraded {
        eprintln!("{}", "warning: degraded answer (failed the quality gate)".yellow());
    }
    eprintln!(
        "{}",
        format!("provider: {}  attempts: {}", response.provider_used, response.attempts).dimmed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads_and_validates() {
        let config = load_config(Some(std::path::Path::new("/nonexistent/llmux.toml")))
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "llmux");
    }

    #[test]
    fn cli_parses_ask_with_overrides() {
        use clap::Parser;
        let cli = Cli::parse_from([
            "llmux", "ask", "what year is it?", "--provider", "perplexity", "--tier", "low",
        ]);
        match cli.command {
            Some(Commands::Ask { text, provider, tier, session }) => {
                assert_eq!(text, "what year is it?");
                assert_eq!(provider.as_deref(), Some("perplexity"));
                assert_eq!(tier, Some(Tier::Low));
                assert_eq!(session, "cli");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
