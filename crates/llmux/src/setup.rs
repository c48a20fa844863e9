// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires configuration into a running router: builds the provider
//! registry from enabled backends, then the conversation store, enricher,
//! quality gate, and router around it.

use std::sync::Arc;

use llmux_config::LlmuxConfig;
use llmux_conversation::{ContextEnricher, ConversationStore};
use llmux_core::error::LlmuxError;
use llmux_router::{ProviderRegistry, ResponseQualityChecker, Router};
use tracing::info;

#[cfg(any(feature = "azure", feature = "gemini", feature = "perplexity", feature = "local"))]
use llmux_core::types::ProviderProfile;
#[cfg(any(feature = "azure", feature = "gemini", feature = "perplexity"))]
fn required_key(key: &Option<String>, backend: &str) -> Result<String, LlmuxError> {
    key.clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| LlmuxError::Config(format!("{backend}.api_key missing")))
}

/// Builds the provider registry from every enabled backend in config.
pub fn build_registry(config: &LlmuxConfig) -> Result<Arc<ProviderRegistry>, LlmuxError> {
    let registry = Arc::new(ProviderRegistry::new(config.routing.unhealthy_threshold));

    #[cfg(feature = "azure")]
    if config.azure.enabled {
        let api_key = required_key(&config.azure.api_key, "azure")?;
        let endpoint = config
            .azure
            .endpoint
            .clone()
            .ok_or_else(|| LlmuxError::Config("azure.endpoint missing".to_string()))?;
        let client = llmux_azure::AzureClient::new(&api_key, endpoint, &config.azure.model)?;
        registry.register(
            Arc::new(client),
            ProviderProfile {
                id: "azure".into(),
                supported_tiers: config.azure.supported_tiers.clone(),
                strengths: config.azure.strengths.clone(),
                relative_cost: config.azure.relative_cost,
                max_tokens_per_minute: config.azure.max_tokens_per_minute,
            },
        );
    }

    #[cfg(feature = "gemini")]
    if config.gemini.enabled {
        let api_key = required_key(&config.gemini.api_key, "gemini")?;
        let client = llmux_gemini::GeminiClient::new(
            &api_key,
            &config.gemini.model,
            config.gemini.endpoint.clone(),
        )?;
        registry.register(
            Arc::new(client),
            ProviderProfile {
                id: "gemini".into(),
                supported_tiers: config.gemini.supported_tiers.clone(),
                strengths: config.gemini.strengths.clone(),
                relative_cost: config.gemini.relative_cost,
                max_tokens_per_minute: config.gemini.max_tokens_per_minute,
            },
        );
    }

    #[cfg(feature = "perplexity")]
    if config.perplexity.enabled {
        let api_key = required_key(&config.perplexity.api_key, "perplexity")?;
        let client = llmux_perplexity::PerplexityClient::new(
            &api_key,
            &config.perplexity.model,
            config.perplexity.endpoint.clone(),
        )?;
        registry.register(
            Arc::new(client),
            ProviderProfile {
                id: "perplexity".into(),
                supported_tiers: config.perplexity.supported_tiers.clone(),
                strengths: config.perplexity.strengths.clone(),
                relative_cost: config.perplexity.relative_cost,
                max_tokens_per_minute: config.perplexity.max_tokens_per_minute,
            },
        );
    }

    #[cfg(feature = "local")]
    if config.local.enabled {
        let client =
            llmux_local::LocalClient::new(&config.local.endpoint, &config.local.model)?;
        registry.register(
            Arc::new(client),
            ProviderProfile {
                id: "local".into(),
                supported_tiers: config.local.supported_tiers.clone(),
                strengths: config.local.strengths.clone(),
                relative_cost: config.local.relative_cost,
                max_tokens_per_minute: config.local.max_tokens_per_minute,
            },
        );
    }

    info!(providers = registry.len(), "provider registry built");
    Ok(registry)
}

/// Builds the full router stack from config.
pub fn build_router(config: &LlmuxConfig) -> Result<Router, LlmuxError> {
    let registry = build_registry(config)?;
    if registry.is_empty() {
        return Err(LlmuxError::Config(
            "no providers enabled; enable at least one backend in llmux.toml".to_string(),
        ));
    }

    let store = Arc::new(ConversationStore::new());
    let facts = Arc::new(config.context.facts.clone());
    let enricher = ContextEnricher::new(
        Arc::clone(&store),
        Arc::clone(&facts),
        config.context.history_window,
    );
    let quality = ResponseQualityChecker::new(&config.quality, facts);

    Ok(Router::new(registry, store, enricher, quality, &config.routing))
}
