// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./llmux.toml` > `~/.config/llmux/llmux.toml` > `/etc/llmux/llmux.toml`
//! with environment variable overrides via `LLMUX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LlmuxConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/llmux/llmux.toml` (system-wide)
/// 3. `~/.config/llmux/llmux.toml` (user XDG config)
/// 4. `./llmux.toml` (local directory)
/// 5. `LLMUX_*` environment variables
pub fn load_config() -> Result<LlmuxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LlmuxConfig::default()))
        .merge(Toml::file("/etc/llmux/llmux.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("llmux/llmux.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("llmux.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LlmuxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LlmuxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LlmuxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LlmuxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LLMUX_AZURE_API_KEY` must map to
/// `azure.api_key`, not `azure.api.key`.
fn env_provider() -> Env {
    Env::prefixed("LLMUX_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("routing_", "routing.", 1)
            .replacen("quality_", "quality.", 1)
            .replacen("context_", "context.", 1)
            .replacen("azure_", "azure.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("perplexity_", "perplexity.", 1)
            .replacen("local_", "local.", 1);
        mapped.into()
    })
}
