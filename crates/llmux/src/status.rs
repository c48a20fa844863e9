// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `llmux status` command implementation.
//!
//! Prints the effective configuration summary and the registered
//! providers with their profiles and current health flags.

use colored::Colorize;
use llmux_config::LlmuxConfig;
use llmux_core::error::LlmuxError;

use crate::setup;

/// Runs the `llmux status` command.
pub fn run_status(config: &LlmuxConfig) -> Result<(), LlmuxError> {
    println!("{}", "llmux status".bold());
    println!(
        "agent: {}  attempt timeout: {}s  unhealthy threshold: {}",
        config.agent.name,
        config.routing.attempt_timeout_secs,
        config.routing.unhealthy_threshold
    );
    println!(
        "static context facts: {}  history window: {}",
        config.context.facts.len(),
        config.context.history_window
    );

    let registry = setup::build_registry(config)?;
    if registry.is_empty() {
        println!("{}", "no providers enabled".yellow());
        return Ok(());
    }

    println!("\n{}", "providers".bold());
    let health = registry.health_snapshot();
    for profile in registry.profiles() {
        let (healthy, failures) = health
            .iter()
            .find(|(id, _, _)| *id == profile.id)
            .map(|(_, h, f)| (*h, *f))
            .unwrap_or((true, 0));
        let flag = if healthy {
            "healthy".green()
        } else {
            "unhealthy".red()
        };
        let tiers: Vec<String> = profile.supported_tiers.iter().map(|t| t.to_string()).collect();
        let strengths: Vec<String> = profile.strengths.iter().map(|c| c.to_string()).collect();
        println!(
            "  {:<12} {}  cost={:.2}  tiers=[{}]  strengths=[{}]  failures={}",
            profile.id.to_string(),
            flag,
            profile.relative_cost,
            tiers.join(","),
            strengths.join(","),
            failures
        );
    }
    Ok(())
}
