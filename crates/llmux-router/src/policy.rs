// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider selection policy: turns a routing hint plus the registry into
//! an ordered candidate list.
//!
//! The ordering contract: explicit provider first (try-first, not only),
//! then tier-capable providers with a matching strength in ascending cost
//! order, then the rest in ascending cost order; unhealthy providers sink
//! to the end but are never removed. Given identical registry state and an
//! identical hint, the list is always identical.

use llmux_core::types::{ProviderId, RouteHint};
use tracing::warn;

use crate::registry::ProviderRegistry;

/// Produces the ordered candidate list for one request.
pub fn candidates(
    hint: RouteHint,
    explicit: Option<&ProviderId>,
    registry: &ProviderRegistry,
) -> Vec<ProviderId> {
    // Registry snapshot is id-sorted, so every later sort is on
    // deterministic input.
    let mut ranked: Vec<_> = registry
        .profiles()
        .into_iter()
        .filter(|p| p.supports(hint.tier))
        .collect();

    ranked.sort_by(|a, b| {
        b.favors(hint.category)
            .cmp(&a.favors(hint.category))
            .then(a.relative_cost.total_cmp(&b.relative_cost))
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });

    // Stable partition: unhealthy providers keep their relative order but
    // move behind every healthy one, so exhaustion still reaches them.
    let (healthy, unhealthy): (Vec<_>, Vec<_>) =
        ranked.into_iter().partition(|p| registry.is_healthy(&p.id));

    let mut ids: Vec<ProviderId> = healthy
        .into_iter()
        .chain(unhealthy)
        .map(|p| p.id)
        .collect();

    // Explicit provider means "try first": it leads the list even when it
    // would not have been selected (wrong tier), but the automatic
    // candidates stay behind it for fallback.
    if let Some(explicit) = explicit {
        if registry.contains(explicit) {
            ids.retain(|id| id != explicit);
            ids.insert(0, explicit.clone());
        } else {
            warn!(provider = %explicit, "explicit provider not registered, ignoring");
        }
    }

    ids
}
