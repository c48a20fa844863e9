// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the routing state machine, driven end to end
//! with scripted mock providers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use llmux_config::model::{QualityConfig, RoutingConfig};
use llmux_conversation::{ContextEnricher, ConversationStore};
use llmux_core::error::{LlmuxError, ProviderError};
use llmux_core::traits::ProviderClient;
use llmux_core::types::{Category, ProviderId, ProviderProfile, Request, Role, Tier};
use llmux_router::{ProviderRegistry, ResponseQualityChecker, Router};
use llmux_test_utils::MockProvider;

const ALL_TIERS: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

fn profile(id: &str, tiers: &[Tier], strengths: &[Category], cost: f64) -> ProviderProfile {
    ProviderProfile {
        id: ProviderId::new(id),
        supported_tiers: tiers.to_vec(),
        strengths: strengths.to_vec(),
        relative_cost: cost,
        max_tokens_per_minute: 60_000,
    }
}

struct Harness {
    registry: Arc<ProviderRegistry>,
    store: Arc<ConversationStore>,
    facts: BTreeMap<String, String>,
    attempt_timeout_secs: u64,
}

impl Harness {
    fn new() -> Self {
        Self {
            registry: Arc::new(ProviderRegistry::new(3)),
            store: Arc::new(ConversationStore::new()),
            facts: BTreeMap::new(),
            attempt_timeout_secs: 5,
        }
    }

    fn register(&self, mock: &Arc<MockProvider>, profile: ProviderProfile) {
        let client: Arc<dyn ProviderClient> = mock.clone();
        self.registry.register(client, profile);
    }

    fn router(&self) -> Router {
        let routing = RoutingConfig {
            attempt_timeout_secs: self.attempt_timeout_secs,
            unhealthy_threshold: 3,
        };
        let facts = Arc::new(self.facts.clone());
        let enricher = ContextEnricher::new(Arc::clone(&self.store), Arc::clone(&facts), 6);
        let quality = ResponseQualityChecker::new(&QualityConfig::default(), facts);
        Router::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            enricher,
            quality,
            &routing,
        )
    }
}

/// The spec-level scenario: a frozen-training-data answer to a live
/// question is rejected by the stale-year rule and the router falls back
/// to the next candidate.
#[tokio::test]
async fn stale_year_answer_falls_back_to_live_provider() {
    let harness = Harness::new();
    let frozen = MockProvider::always("frozen", "It is currently 2023");
    let live = MockProvider::always("live", "It is 2025");
    // Both are current-data capable; the frozen one is cheaper, so it
    // ranks (and is attempted) first.
    harness.register(&frozen, profile("frozen", &ALL_TIERS, &[Category::CurrentData], 0.2));
    harness.register(&live, profile("live", &ALL_TIERS, &[Category::CurrentData], 0.5));

    let response = harness
        .router()
        .handle(Request::new("what year is it?", "s1"))
        .await
        .unwrap();

    assert_eq!(response.text, "It is 2025");
    assert_eq!(response.provider_used.as_str(), "live");
    assert!(!response.degraded);
    assert_eq!(response.attempts, 2);
    assert_eq!(frozen.calls(), 1);
    assert_eq!(live.calls(), 1);
    assert_eq!(response.outcomes[0].reason_rejected.as_deref(), Some("stale year `2023` in current-data response"));
}

/// Current-data requests rank current-data-strength providers first,
/// regardless of registration order.
#[tokio::test]
async fn current_data_strength_ranks_first() {
    let harness = Harness::new();
    let generalist = MockProvider::always("generalist", "an answer");
    let search = MockProvider::always("search", "live answer from 2026");
    // Register the generalist first and make it cheaper; strength must
    // still win the ranking.
    harness.register(&generalist, profile("generalist", &ALL_TIERS, &[Category::General], 0.1));
    harness.register(&search, profile("search", &ALL_TIERS, &[Category::CurrentData], 0.9));

    let response = harness
        .router()
        .handle(Request::new("elon musk net worth", "s1"))
        .await
        .unwrap();

    assert_eq!(response.provider_used.as_str(), "search");
    assert_eq!(response.attempts, 1);
    assert_eq!(generalist.calls(), 0);
}

/// When every provider is unreachable, the caller gets a typed
/// `NoProviderAvailable`, not a crash, and the attempt count equals the
/// number of registered providers supporting the tier.
#[tokio::test]
async fn total_unreachability_surfaces_no_provider_available() {
    let harness = Harness::new();
    let mocks: Vec<Arc<MockProvider>> = ["a", "b", "c"]
        .iter()
        .map(|id| MockProvider::new(*id))
        .collect();
    for (i, mock) in mocks.iter().enumerate() {
        mock.push_error(ProviderError::Unreachable("connection refused".into()))
            .await;
        harness.register(mock, profile(mock.id().as_str(), &ALL_TIERS, &[], 0.1 * (i + 1) as f64));
    }

    let result = harness
        .router()
        .handle(Request::new("hello there", "s1"))
        .await;

    assert!(matches!(result, Err(LlmuxError::NoProviderAvailable { .. })));
    for mock in &mocks {
        assert_eq!(mock.calls(), 1, "every tier-capable provider attempted once");
    }
    // Nothing usable came back, so the conversation log stays empty.
    assert_eq!(harness.store.message_count("s1"), 0);
}

/// An explicit provider override is attempted first regardless of
/// classification, and falls through to the automatic policy on failure.
#[tokio::test]
async fn explicit_override_is_tried_first_then_falls_through() {
    let harness = Harness::new();
    let pinned = MockProvider::new("pinned");
    pinned
        .push_error(ProviderError::RateLimited("try later".into()))
        .await;
    let automatic = MockProvider::always("automatic", "fallback answer");
    harness.register(&pinned, profile("pinned", &ALL_TIERS, &[], 0.9));
    harness.register(&automatic, profile("automatic", &ALL_TIERS, &[Category::General], 0.1));

    let request = Request::new("tell me a story", "s1").with_provider(ProviderId::new("pinned"));
    let response = harness.router().handle(request).await.unwrap();

    assert_eq!(pinned.calls(), 1, "explicit provider attempted first");
    assert_eq!(response.provider_used.as_str(), "automatic");
    assert_eq!(response.attempts, 2);
    assert!(!response.degraded);
}

#[tokio::test]
async fn explicit_override_wins_when_it_answers() {
    let harness = Harness::new();
    let pinned = MockProvider::always("pinned", "pinned answer");
    let other = MockProvider::always("other", "other answer");
    harness.register(&pinned, profile("pinned", &ALL_TIERS, &[], 0.9));
    harness.register(&other, profile("other", &ALL_TIERS, &[Category::General], 0.1));

    let request = Request::new("anything at all", "s1").with_provider(ProviderId::new("pinned"));
    let response = harness.router().handle(request).await.unwrap();

    assert_eq!(response.provider_used.as_str(), "pinned");
    assert_eq!(other.calls(), 0);
}

/// When every candidate answers but none passes the quality gate, the last
/// answer comes back flagged degraded instead of an error.
#[tokio::test]
async fn exhaustion_with_text_returns_degraded_answer() {
    let harness = Harness::new();
    let first = MockProvider::always("first", "I cannot provide that information.");
    let second = MockProvider::always("second", "I cannot provide an answer to this.");
    harness.register(&first, profile("first", &ALL_TIERS, &[], 0.1));
    harness.register(&second, profile("second", &ALL_TIERS, &[], 0.2));

    let response = harness
        .router()
        .handle(Request::new("greetings", "s1"))
        .await
        .unwrap();

    assert!(response.degraded);
    assert_eq!(response.provider_used.as_str(), "second");
    assert_eq!(response.text, "I cannot provide an answer to this.");
    assert_eq!(response.attempts, 2);
    // The degraded answer is what the caller saw, so it lands in the log.
    assert_eq!(harness.store.message_count("s1"), 2);
}

/// An accepted answer appends exactly one user/assistant pair.
#[tokio::test]
async fn accepted_answer_appends_exchange_pair() {
    let harness = Harness::new();
    let provider = MockProvider::always("p", "Hello back!");
    harness.register(&provider, profile("p", &ALL_TIERS, &[], 0.1));

    harness
        .router()
        .handle(Request::new("say hello", "s1"))
        .await
        .unwrap();

    let messages = harness.store.recent_messages("s1", 10);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "say hello");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Hello back!");
}

/// Conversation history is threaded into later prompts on the same
/// session, and sessions never observe each other.
#[tokio::test]
async fn history_is_threaded_and_sessions_stay_isolated() {
    let harness = Harness::new();
    let provider = MockProvider::always("p", "noted");
    harness.register(&provider, profile("p", &ALL_TIERS, &[], 0.1));
    let router = harness.router();

    router.handle(Request::new("my dog is called Rex", "alpha")).await.unwrap();
    router.handle(Request::new("what is my dog called?", "alpha")).await.unwrap();
    router.handle(Request::new("unrelated question", "beta")).await.unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 3);
    // Second prompt on the same session carries the first turn.
    assert!(prompts[1].contains("my dog is called Rex"));
    // The other session sees none of it.
    assert!(!prompts[2].contains("Rex"));

    assert_eq!(harness.store.message_count("alpha"), 4);
    assert_eq!(harness.store.message_count("beta"), 2);
}

/// A stalled provider trips the per-attempt timeout and the router moves on.
#[tokio::test(start_paused = true)]
async fn stalled_attempt_times_out_and_falls_back() {
    let mut harness = Harness::new();
    harness.attempt_timeout_secs = 2;
    let stuck = MockProvider::new("stuck");
    stuck
        .push_stall(Duration::from_secs(3600), "too late")
        .await;
    let quick = MockProvider::always("quick", "prompt answer");
    harness.register(&stuck, profile("stuck", &ALL_TIERS, &[], 0.1));
    harness.register(&quick, profile("quick", &ALL_TIERS, &[], 0.2));

    let response = harness
        .router()
        .handle(Request::new("are you there?", "s1"))
        .await
        .unwrap();

    assert_eq!(response.provider_used.as_str(), "quick");
    assert_eq!(response.outcomes[0].reason_rejected.as_deref(), Some("timeout"));
}

/// With no healthy candidate the router fails before any network call.
#[tokio::test]
async fn no_healthy_candidate_fails_before_any_call() {
    let harness = Harness::new();
    let only = MockProvider::always("only", "never reached");
    harness.register(&only, profile("only", &ALL_TIERS, &[], 0.1));
    let id = ProviderId::new("only");
    for _ in 0..3 {
        harness.registry.record_failure(&id);
    }

    let result = harness
        .router()
        .handle(Request::new("hello", "s1"))
        .await;

    assert!(matches!(result, Err(LlmuxError::NoProviderAvailable { .. })));
    assert_eq!(only.calls(), 0, "no network call once selection fails");
}

/// A tier no provider supports yields an empty candidate list and the
/// typed failure, before any call.
#[tokio::test]
async fn unsupported_tier_yields_no_provider_available() {
    let harness = Harness::new();
    let low_only = MockProvider::always("low-only", "cheap answer");
    harness.register(&low_only, profile("low-only", &[Tier::Low], &[], 0.1));

    let request = Request::new("hi", "s1").with_tier(Tier::High);
    let result = harness.router().handle(request).await;

    assert!(matches!(result, Err(LlmuxError::NoProviderAvailable { .. })));
    assert_eq!(low_only.calls(), 0);
}

/// An unhealthy provider is deprioritized but still reached once the
/// healthy ones fail.
#[tokio::test]
async fn unhealthy_provider_is_last_resort() {
    let harness = Harness::new();
    let flagged = MockProvider::always("flagged", "flagged answer");
    let preferred = MockProvider::new("preferred");
    preferred
        .push_error(ProviderError::Unreachable("down".into()))
        .await;
    harness.register(&flagged, profile("flagged", &ALL_TIERS, &[], 0.1));
    harness.register(&preferred, profile("preferred", &ALL_TIERS, &[], 0.5));

    let flagged_id = ProviderId::new("flagged");
    for _ in 0..3 {
        harness.registry.record_failure(&flagged_id);
    }

    let response = harness
        .router()
        .handle(Request::new("anyone home?", "s1"))
        .await
        .unwrap();

    assert_eq!(response.provider_used.as_str(), "flagged");
    assert_eq!(response.attempts, 2);
    // Success on the last-resort attempt restores its health flag.
    assert!(harness.registry.is_healthy(&flagged_id));
}
