// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider registry: the single process-wide source of truth for
//! registered backends, their profiles, and their advisory health flags.
//!
//! Health is tracked per provider as a consecutive-failure counter plus a
//! boolean flag flipped by compare-and-swap when the counter crosses the
//! configured threshold. Reads are lock-free atomics; the flags are
//! advisory hints for candidate ordering, so a racy read that momentarily
//! misclassifies health is acceptable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use dashmap::DashMap;
use llmux_core::traits::ProviderClient;
use llmux_core::types::{ProviderId, ProviderProfile};
use tracing::{info, warn};

/// Advisory per-provider health state.
#[derive(Debug)]
struct ProviderHealth {
    consecutive_failures: AtomicU32,
    healthy: AtomicBool,
}

impl ProviderHealth {
    fn new() -> Self {
        Self {
            consecutive_failures: AtomicU32::new(0),
            healthy: AtomicBool::new(true),
        }
    }
}

struct RegisteredProvider {
    client: Arc<dyn ProviderClient>,
    profile: ProviderProfile,
    health: ProviderHealth,
}

impl std::fmt::Debug for RegisteredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredProvider")
            .field("client", &self.client.id())
            .field("profile", &self.profile)
            .field("health", &self.health)
            .finish()
    }
}

/// Registry of provider backends, shared by reference into the router.
///
/// Profiles are read-only after registration; only the health fields
/// mutate. New backends are added by registering a new [`ProviderClient`]
/// implementation, never by editing the router.
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: DashMap<ProviderId, RegisteredProvider>,
    unhealthy_threshold: u32,
}

impl ProviderRegistry {
    /// Creates an empty registry flagging providers unhealthy after
    /// `unhealthy_threshold` consecutive failures.
    pub fn new(unhealthy_threshold: u32) -> Self {
        Self {
            providers: DashMap::new(),
            unhealthy_threshold: unhealthy_threshold.max(1),
        }
    }

    /// Registers a backend under its profile id, replacing any previous
    /// registration for that id.
    pub fn register(&self, client: Arc<dyn ProviderClient>, profile: ProviderProfile) {
        let id = profile.id.clone();
        info!(provider = %id, cost = profile.relative_cost, "provider registered");
        self.providers.insert(
            id,
            RegisteredProvider {
                client,
                profile,
                health: ProviderHealth::new(),
            },
        );
    }

    pub fn contains(&self, id: &ProviderId) -> bool {
        self.providers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The client registered under `id`, if any.
    pub fn client(&self, id: &ProviderId) -> Option<Arc<dyn ProviderClient>> {
        self.providers.get(id).map(|p| Arc::clone(&p.client))
    }

    /// Snapshot of all profiles, sorted by id so downstream ordering is
    /// independent of map iteration order.
    pub fn profiles(&self) -> Vec<ProviderProfile> {
        let mut profiles: Vec<ProviderProfile> =
            self.providers.iter().map(|p| p.profile.clone()).collect();
        profiles.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        profiles
    }

    /// Current advisory health flag; unknown providers read as healthy.
    pub fn is_healthy(&self, id: &ProviderId) -> bool {
        self.providers
            .get(id)
            .map_or(true, |p| p.health.healthy.load(Ordering::Relaxed))
    }

    /// Records one failed attempt; flips the health flag when the
    /// consecutive-failure count reaches the threshold.
    pub fn record_failure(&self, id: &ProviderId) {
        let Some(provider) = self.providers.get(id) else {
            return;
        };
        let failures = provider
            .health
            .consecutive_failures
            .fetch_add(1, Ordering::Relaxed)
            + 1;
        if failures >= self.unhealthy_threshold
            && provider
                .health
                .healthy
                .compare_exchange(true, false, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            warn!(provider = %id, failures, "provider flagged unhealthy");
        }
    }

    /// Records one successful attempt; resets the failure count and
    /// restores the health flag.
    pub fn record_success(&self, id: &ProviderId) {
        let Some(provider) = self.providers.get(id) else {
            return;
        };
        provider
            .health
            .consecutive_failures
            .store(0, Ordering::Relaxed);
        if provider
            .health
            .healthy
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            info!(provider = %id, "provider recovered");
        }
    }

    /// Health snapshot for status reporting: (id, healthy, consecutive failures).
    pub fn health_snapshot(&self) -> Vec<(ProviderId, bool, u32)> {
        let mut snapshot: Vec<(ProviderId, bool, u32)> = self
            .providers
            .iter()
            .map(|p| {
                (
                    p.key().clone(),
                    p.health.healthy.load(Ordering::Relaxed),
                    p.health.consecutive_failures.load(Ordering::Relaxed),
                )
            })
            .collect();
        snapshot.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        snapshot
    }
}
