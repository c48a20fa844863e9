// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the llmux router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use llmux_core::types::{Category, Tier};
use serde::{Deserialize, Serialize};

/// Top-level llmux configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmuxConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Fallback-loop and provider-health settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Response quality gate rule tables.
    #[serde(default)]
    pub quality: QualityConfig,

    /// Static context facts and history window for enrichment.
    #[serde(default)]
    pub context: ContextConfig,

    /// Azure OpenAI backend settings.
    #[serde(default)]
    pub azure: AzureConfig,

    /// Google Gemini backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Perplexity backend settings.
    #[serde(default)]
    pub perplexity: PerplexityConfig,

    /// Local model backend settings (Ollama-compatible daemon).
    #[serde(default)]
    pub local: LocalConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "llmux".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fallback-loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Per-attempt timeout in seconds, enforced uniformly by the router.
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,

    /// Consecutive failures before a provider is flagged unhealthy.
    #[serde(default = "default_unhealthy_threshold")]
    pub unhealthy_threshold: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout_secs(),
            unhealthy_threshold: default_unhealthy_threshold(),
        }
    }
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

fn default_unhealthy_threshold() -> u32 {
    3
}

/// Quality gate rule tables.
///
/// These are snapshots of current events and provider phrasing, expected to
/// be refreshed from config rather than maintained in code.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QualityConfig {
    /// Year strings that mark a current-data answer as stale.
    #[serde(default = "default_stale_years")]
    pub stale_years: Vec<String>,

    /// Generic refusal phrases that mark an answer as unusable.
    #[serde(default = "default_refusal_phrases")]
    pub refusal_phrases: Vec<String>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            stale_years: default_stale_years(),
            refusal_phrases: default_refusal_phrases(),
        }
    }
}

fn default_stale_years() -> Vec<String> {
    ["2020", "2021", "2022", "2023"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_refusal_phrases() -> Vec<String> {
    [
        "I cannot provide",
        "I can't provide",
        "I don't have access to real-time",
        "I do not have access to real-time",
        "I'm unable to browse",
        "as of my last update",
        "my knowledge cutoff",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Context enrichment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Static facts prepended to every enriched request.
    /// Read-only for the process lifetime.
    #[serde(default)]
    pub facts: BTreeMap<String, String>,

    /// Number of recent conversation messages included in enrichment.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            facts: BTreeMap::new(),
            history_window: default_history_window(),
        }
    }
}

fn default_history_window() -> usize {
    6
}

/// Azure OpenAI backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AzureConfig {
    /// Enable this backend. Disabled backends are never registered.
    #[serde(default)]
    pub enabled: bool,

    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Deployment (model) name.
    #[serde(default = "default_azure_model")]
    pub model: String,

    /// Relative cost used for candidate ranking; lower is cheaper.
    #[serde(default = "default_azure_cost")]
    pub relative_cost: f64,

    /// Complexity tiers this backend serves.
    #[serde(default = "default_azure_tiers")]
    pub supported_tiers: Vec<Tier>,

    /// Categories this backend is strong at.
    #[serde(default = "default_azure_strengths")]
    pub strengths: Vec<Category>,

    /// Advisory throughput ceiling.
    #[serde(default = "default_azure_tpm")]
    pub max_tokens_per_minute: u32,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            endpoint: None,
            model: default_azure_model(),
            relative_cost: default_azure_cost(),
            supported_tiers: default_azure_tiers(),
            strengths: default_azure_strengths(),
            max_tokens_per_minute: default_azure_tpm(),
        }
    }
}

fn default_azure_model() -> String {
    "gpt-4o".to_string()
}

fn default_azure_cost() -> f64 {
    1.0
}

fn default_azure_tiers() -> Vec<Tier> {
    vec![Tier::Low, Tier::Medium, Tier::High]
}

fn default_azure_strengths() -> Vec<Category> {
    vec![Category::Technical, Category::ComplexReasoning]
}

fn default_azure_tpm() -> u32 {
    80_000
}

/// Google Gemini backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Enable this backend.
    #[serde(default)]
    pub enabled: bool,

    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override for the API base URL (testing).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Relative cost used for candidate ranking.
    #[serde(default = "default_gemini_cost")]
    pub relative_cost: f64,

    /// Complexity tiers this backend serves.
    #[serde(default = "default_gemini_tiers")]
    pub supported_tiers: Vec<Tier>,

    /// Categories this backend is strong at.
    #[serde(default = "default_gemini_strengths")]
    pub strengths: Vec<Category>,

    /// Advisory throughput ceiling.
    #[serde(default = "default_gemini_tpm")]
    pub max_tokens_per_minute: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            endpoint: None,
            model: default_gemini_model(),
            relative_cost: default_gemini_cost(),
            supported_tiers: default_gemini_tiers(),
            strengths: default_gemini_strengths(),
            max_tokens_per_minute: default_gemini_tpm(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_cost() -> f64 {
    0.6
}

fn default_gemini_tiers() -> Vec<Tier> {
    vec![Tier::Low, Tier::Medium, Tier::High]
}

fn default_gemini_strengths() -> Vec<Category> {
    vec![Category::ComplexReasoning, Category::General]
}

fn default_gemini_tpm() -> u32 {
    120_000
}

/// Perplexity backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PerplexityConfig {
    /// Enable this backend.
    #[serde(default)]
    pub enabled: bool,

    /// API key. `None` requires the environment variable override.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override for the API base URL (testing).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model identifier. Online models answer from live search.
    #[serde(default = "default_perplexity_model")]
    pub model: String,

    /// Relative cost used for candidate ranking.
    #[serde(default = "default_perplexity_cost")]
    pub relative_cost: f64,

    /// Complexity tiers this backend serves.
    #[serde(default = "default_perplexity_tiers")]
    pub supported_tiers: Vec<Tier>,

    /// Categories this backend is strong at.
    #[serde(default = "default_perplexity_strengths")]
    pub strengths: Vec<Category>,

    /// Advisory throughput ceiling.
    #[serde(default = "default_perplexity_tpm")]
    pub max_tokens_per_minute: u32,
}

impl Default for PerplexityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            endpoint: None,
            model: default_perplexity_model(),
            relative_cost: default_perplexity_cost(),
            supported_tiers: default_perplexity_tiers(),
            strengths: default_perplexity_strengths(),
            max_tokens_per_minute: default_perplexity_tpm(),
        }
    }
}

fn default_perplexity_model() -> String {
    "sonar-pro".to_string()
}

fn default_perplexity_cost() -> f64 {
    0.4
}

fn default_perplexity_tiers() -> Vec<Tier> {
    vec![Tier::Low, Tier::Medium]
}

fn default_perplexity_strengths() -> Vec<Category> {
    vec![Category::CurrentData]
}

fn default_perplexity_tpm() -> u32 {
    60_000
}

/// Local model backend configuration (Ollama-compatible daemon).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    /// Enable this backend.
    #[serde(default)]
    pub enabled: bool,

    /// Daemon base URL.
    #[serde(default = "default_local_endpoint")]
    pub endpoint: String,

    /// Model identifier.
    #[serde(default = "default_local_model")]
    pub model: String,

    /// Relative cost used for candidate ranking.
    #[serde(default = "default_local_cost")]
    pub relative_cost: f64,

    /// Complexity tiers this backend serves.
    #[serde(default = "default_local_tiers")]
    pub supported_tiers: Vec<Tier>,

    /// Categories this backend is strong at.
    #[serde(default)]
    pub strengths: Vec<Category>,

    /// Advisory throughput ceiling.
    #[serde(default = "default_local_tpm")]
    pub max_tokens_per_minute: u32,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_local_endpoint(),
            model: default_local_model(),
            relative_cost: default_local_cost(),
            supported_tiers: default_local_tiers(),
            strengths: Vec::new(),
            max_tokens_per_minute: default_local_tpm(),
        }
    }
}

fn default_local_endpoint() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_local_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_local_cost() -> f64 {
    0.05
}

fn default_local_tiers() -> Vec<Tier> {
    vec![Tier::Low]
}

fn default_local_tpm() -> u32 {
    30_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = LlmuxConfig::default();
        assert_eq!(config.agent.name, "llmux");
        assert_eq!(config.routing.attempt_timeout_secs, 30);
        assert_eq!(config.routing.unhealthy_threshold, 3);
        assert_eq!(config.context.history_window, 6);
        assert!(config.context.facts.is_empty());
        assert!(!config.azure.enabled);
        assert!(!config.local.enabled);
    }

    #[test]
    fn stale_years_default_is_past_years_only() {
        let config = QualityConfig::default();
        assert!(config.stale_years.contains(&"2023".to_string()));
        assert!(!config.stale_years.contains(&"2025".to_string()));
    }

    #[test]
    fn tiers_deserialize_from_lowercase() {
        let toml_str = r#"
[perplexity]
enabled = true
supported_tiers = ["low", "medium", "high"]
strengths = ["current_data"]
"#;
        let config: LlmuxConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.perplexity.supported_tiers,
            vec![Tier::Low, Tier::Medium, Tier::High]
        );
        assert_eq!(config.perplexity.strengths, vec![Category::CurrentData]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml_str = r#"
[routing]
attempt_timeout_secs = 10
not_a_real_key = true
"#;
        assert!(toml::from_str::<LlmuxConfig>(toml_str).is_err());
    }

    #[test]
    fn context_facts_deserialize() {
        let toml_str = r#"
[context.facts]
project = "atlas pipeline"
owner = "data platform team"
"#;
        let config: LlmuxConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.context.facts.get("project").map(String::as_str),
            Some("atlas pipeline")
        );
    }
}
