// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The routing state machine.
//!
//! One request moves through: Classifying -> Selecting -> Attempting(i) ->
//! Evaluating(i) -> { Accepted | Attempting(i+1) | Exhausted }. Provider
//! errors and quality rejections both record an outcome and advance to the
//! next candidate; nothing provider-level ever crosses the router boundary.
//! Each state is visited at most once per attempt index, no cycles.

use std::sync::Arc;
use std::time::{Duration, Instant};

use llmux_config::model::RoutingConfig;
use llmux_conversation::{ContextEnricher, ConversationStore};
use llmux_core::error::{LlmuxError, ProviderError};
use llmux_core::types::{Message, Outcome, ProviderId, Request, Role};
use tracing::{debug, info, warn};

use crate::classifier::RequestClassifier;
use crate::policy;
use crate::quality::ResponseQualityChecker;
use crate::registry::ProviderRegistry;

/// Phases of one request's journey, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Classifying,
    Selecting,
    Attempting(usize),
    Evaluating(usize),
    Accepted,
    Exhausted,
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestState::Classifying => write!(f, "classifying"),
            RequestState::Selecting => write!(f, "selecting"),
            RequestState::Attempting(i) => write!(f, "attempting({i})"),
            RequestState::Evaluating(i) => write!(f, "evaluating({i})"),
            RequestState::Accepted => write!(f, "accepted"),
            RequestState::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// What the caller gets back from [`Router::handle`].
#[derive(Debug, Clone)]
pub struct RouterResponse {
    /// The answer text.
    pub text: String,
    /// Provider that produced the returned text.
    pub provider_used: ProviderId,
    /// True when the answer failed the quality gate but was still the most
    /// useful thing to return.
    pub degraded: bool,
    /// Number of attempts made, including the returned one.
    pub attempts: usize,
    /// Full per-attempt trail for observability.
    pub outcomes: Vec<Outcome>,
}

/// Orchestrates classification, candidate selection, the fallback loop,
/// quality gating, and conversation bookkeeping.
///
/// Cheap to clone; invoked concurrently from any number of tasks. Requests
/// on different sessions never block each other; same-session conversation
/// appends serialize inside the store. Cancellation is by drop: abandoning
/// the `handle` future cancels the in-flight provider call and no further
/// attempts start.
#[derive(Clone, Debug)]
pub struct Router {
    registry: Arc<ProviderRegistry>,
    store: Arc<ConversationStore>,
    enricher: ContextEnricher,
    classifier: RequestClassifier,
    quality: ResponseQualityChecker,
    attempt_timeout: Duration,
}

impl Router {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        store: Arc<ConversationStore>,
        enricher: ContextEnricher,
        quality: ResponseQualityChecker,
        routing: &RoutingConfig,
    ) -> Self {
        Self {
            registry,
            store,
            enricher,
            classifier: RequestClassifier::new(),
            quality,
            attempt_timeout: Duration::from_secs(routing.attempt_timeout_secs),
        }
    }

    /// Handles one request end to end.
    ///
    /// Returns the first quality-accepted answer, or the last attempt's
    /// text flagged `degraded` when every candidate failed the gate, or
    /// [`LlmuxError::NoProviderAvailable`] when no candidate produced any
    /// usable text at all.
    pub async fn handle(&self, request: Request) -> Result<RouterResponse, LlmuxError> {
        let request_id = uuid::Uuid::new_v4();

        let enriched = self.enricher.enrich(&request);

        debug!(%request_id, state = %RequestState::Classifying, session_id = %request.session_id, "routing request");
        let hint = self
            .classifier
            .classify(&request.text, request.explicit_tier);

        debug!(%request_id, state = %RequestState::Selecting, tier = %hint.tier, category = %hint.category, "classified");
        let candidates = policy::candidates(hint, request.explicit_provider.as_ref(), &self.registry);

        // Fail before any network call unless at least one candidate is
        // registered and currently marked healthy.
        if !candidates.iter().any(|id| self.registry.is_healthy(id)) {
            warn!(%request_id, tier = %hint.tier, category = %hint.category, "no healthy candidate");
            return Err(LlmuxError::NoProviderAvailable {
                tier: hint.tier,
                category: hint.category,
            });
        }

        let mut outcomes: Vec<Outcome> = Vec::with_capacity(candidates.len());

        for (i, provider_id) in candidates.iter().enumerate() {
            // A provider can vanish between selection and attempt if the
            // registry is mutated concurrently; skip without an outcome.
            let Some(client) = self.registry.client(provider_id) else {
                continue;
            };

            debug!(%request_id, state = %RequestState::Attempting(i), provider = %provider_id, "attempting");
            let started = Instant::now();
            let result = tokio::time::timeout(self.attempt_timeout, client.send(&enriched.prompt))
                .await
                .unwrap_or(Err(ProviderError::Timeout {
                    duration: self.attempt_timeout,
                }));
            let latency_ms = started.elapsed().as_millis() as u64;

            match result {
                Err(err) => {
                    self.registry.record_failure(provider_id);
                    debug!(%request_id, provider = %provider_id, error = %err, latency_ms, "attempt failed");
                    outcomes.push(Outcome {
                        provider: provider_id.clone(),
                        text: String::new(),
                        accepted: false,
                        reason_rejected: Some(err.kind().to_string()),
                        latency_ms,
                    });
                }
                Ok(text) => {
                    self.registry.record_success(provider_id);
                    debug!(%request_id, state = %RequestState::Evaluating(i), provider = %provider_id, latency_ms, "evaluating");

                    match self.quality.check(&request.text, hint.category, &text) {
                        Ok(()) => {
                            outcomes.push(Outcome {
                                provider: provider_id.clone(),
                                text: text.clone(),
                                accepted: true,
                                reason_rejected: None,
                                latency_ms,
                            });
                            self.record_exchange(&request, &text);
                            info!(%request_id, state = %RequestState::Accepted, provider = %provider_id, attempts = i + 1, "accepted");
                            return Ok(RouterResponse {
                                text,
                                provider_used: provider_id.clone(),
                                degraded: false,
                                attempts: i + 1,
                                outcomes,
                            });
                        }
                        Err(reason) => {
                            debug!(%request_id, provider = %provider_id, reason = %reason, "quality rejected");
                            outcomes.push(Outcome {
                                provider: provider_id.clone(),
                                text,
                                accepted: false,
                                reason_rejected: Some(reason.to_string()),
                                latency_ms,
                            });
                        }
                    }
                }
            }
        }

        // Exhausted: the best we can do is the last attempt that returned
        // any text, surfaced as a degraded answer.
        let attempts = outcomes.len();
        if let Some(last_with_text) = outcomes.iter().rposition(|o| !o.text.is_empty()) {
            let last = outcomes[last_with_text].clone();
            warn!(%request_id, state = %RequestState::Exhausted, provider = %last.provider, attempts, "returning degraded answer");
            self.record_exchange(&request, &last.text);
            return Ok(RouterResponse {
                text: last.text,
                provider_used: last.provider,
                degraded: true,
                attempts,
                outcomes,
            });
        }

        warn!(%request_id, state = %RequestState::Exhausted, attempts, "no usable text from any candidate");
        Err(LlmuxError::NoProviderAvailable {
            tier: hint.tier,
            category: hint.category,
        })
    }

    /// Appends the user/assistant pair for an answer the caller will see.
    fn record_exchange(&self, request: &Request, answer: &str) {
        self.store.append_exchange(
            &request.session_id,
            Message::new(Role::User, request.text.clone()),
            Message::new(Role::Assistant, answer),
        );
    }

    /// The conversation store this router writes into.
    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// The provider registry this router selects from.
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }
}
