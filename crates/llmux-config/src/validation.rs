// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive timeouts and credentials for enabled
//! backends.

use crate::model::LlmuxConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<String>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LlmuxConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.routing.attempt_timeout_secs == 0 {
        errors.push("routing.attempt_timeout_secs must be positive".to_string());
    }

    if config.routing.unhealthy_threshold == 0 {
        errors.push("routing.unhealthy_threshold must be positive".to_string());
    }

    if config.context.history_window == 0 {
        errors.push("context.history_window must be positive".to_string());
    }

    // Enabled hosted backends need credentials and a sane cost.
    let hosted: [(&str, bool, &Option<String>, f64); 3] = [
        ("azure", config.azure.enabled, &config.azure.api_key, config.azure.relative_cost),
        ("gemini", config.gemini.enabled, &config.gemini.api_key, config.gemini.relative_cost),
        (
            "perplexity",
            config.perplexity.enabled,
            &config.perplexity.api_key,
            config.perplexity.relative_cost,
        ),
    ];
    for (name, enabled, api_key, cost) in hosted {
        if enabled && api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            errors.push(format!(
                "{name}.api_key is required when {name}.enabled = true (or set LLMUX_{}_API_KEY)",
                name.to_uppercase()
            ));
        }
        if enabled && !(cost.is_finite() && cost >= 0.0) {
            errors.push(format!("{name}.relative_cost must be a non-negative number, got {cost}"));
        }
    }

    if config.azure.enabled
        && config.azure.endpoint.as_deref().is_none_or(|e| e.trim().is_empty())
    {
        errors.push("azure.endpoint is required when azure.enabled = true".to_string());
    }

    if config.local.enabled && config.local.endpoint.trim().is_empty() {
        errors.push("local.endpoint must not be empty when local.enabled = true".to_string());
    }

    // Empty stale-year strings would match every response.
    for year in &config.quality.stale_years {
        if year.trim().is_empty() {
            errors.push("quality.stale_years must not contain empty strings".to_string());
            break;
        }
    }
    for phrase in &config.quality.refusal_phrases {
        if phrase.trim().is_empty() {
            errors.push("quality.refusal_phrases must not contain empty strings".to_string());
            break;
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
