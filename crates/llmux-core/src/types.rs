// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the llmux workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies one registered provider backend.
///
/// Well-known ids are `azure`, `gemini`, `perplexity`, and `local`, but the
/// registry accepts any id; new backends register under a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Coarse complexity classification of a request.
///
/// Ordered so that a keyword-implied tier floor can be combined with
/// length-based inference via `max`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

/// Content-type classification used to match provider strengths.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CurrentData,
    Technical,
    ComplexReasoning,
    General,
}

/// Routing hint derived from a request. Recomputed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteHint {
    pub tier: Tier,
    pub category: Category,
}

/// Static, read-only description of one provider's capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: ProviderId,
    /// Complexity tiers this backend is allowed to serve.
    pub supported_tiers: Vec<Tier>,
    /// Categories this backend is considered strong at.
    pub strengths: Vec<Category>,
    /// Relative cost used for rank ordering; lower is cheaper.
    pub relative_cost: f64,
    /// Advisory throughput ceiling; enforcement lives outside the router.
    pub max_tokens_per_minute: u32,
}

impl ProviderProfile {
    pub fn supports(&self, tier: Tier) -> bool {
        self.supported_tiers.contains(&tier)
    }

    pub fn favors(&self, category: Category) -> bool {
        self.strengths.contains(&category)
    }
}

/// One inbound request. Immutable once created.
#[derive(Debug, Clone)]
pub struct Request {
    pub text: String,
    pub session_id: String,
    /// Caller-pinned provider: tried first, not exclusively.
    pub explicit_provider: Option<ProviderId>,
    /// Caller-pinned complexity tier, bypassing inference.
    pub explicit_tier: Option<Tier>,
}

impl Request {
    pub fn new(text: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: session_id.into(),
            explicit_provider: None,
            explicit_tier: None,
        }
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.explicit_provider = Some(provider);
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.explicit_tier = Some(tier);
        self
    }
}

/// A request after context enrichment: the prompt actually sent to a
/// provider, plus the untouched original.
#[derive(Debug, Clone)]
pub struct EnrichedRequest {
    pub prompt: String,
    pub original: Request,
}

/// Result of one provider attempt. The router keeps the full sequence for
/// observability; only the final one determines the response.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub provider: ProviderId,
    pub text: String,
    pub accepted: bool,
    pub reason_rejected: Option<String>,
    pub latency_ms: u64,
}

/// Speaker role within a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One conversation message. Immutable once appended to a session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn provider_id_display_and_from() {
        let id = ProviderId::from("azure");
        assert_eq!(id.to_string(), "azure");
        assert_eq!(id.as_str(), "azure");
        assert_eq!(id, ProviderId::new("azure"));
    }

    #[test]
    fn tier_ordering_supports_floors() {
        assert!(Tier::Low < Tier::Medium);
        assert!(Tier::Medium < Tier::High);
        assert_eq!(Tier::Low.max(Tier::High), Tier::High);
    }

    #[test]
    fn tier_and_category_round_trip_strings() {
        for tier in [Tier::Low, Tier::Medium, Tier::High] {
            assert_eq!(Tier::from_str(&tier.to_string()).unwrap(), tier);
        }
        for cat in [
            Category::CurrentData,
            Category::Technical,
            Category::ComplexReasoning,
            Category::General,
        ] {
            assert_eq!(Category::from_str(&cat.to_string()).unwrap(), cat);
        }
    }

    #[test]
    fn category_serde_uses_snake_case() {
        let json = serde_json::to_string(&Category::CurrentData).unwrap();
        assert_eq!(json, "\"current_data\"");
    }

    #[test]
    fn profile_supports_and_favors() {
        let profile = ProviderProfile {
            id: ProviderId::new("perplexity"),
            supported_tiers: vec![Tier::Low, Tier::Medium],
            strengths: vec![Category::CurrentData],
            relative_cost: 0.4,
            max_tokens_per_minute: 60_000,
        };
        assert!(profile.supports(Tier::Low));
        assert!(!profile.supports(Tier::High));
        assert!(profile.favors(Category::CurrentData));
        assert!(!profile.favors(Category::Technical));
    }

    #[test]
    fn request_builder_overrides() {
        let req = Request::new("hello", "s1")
            .with_provider(ProviderId::new("gemini"))
            .with_tier(Tier::High);
        assert_eq!(req.explicit_provider.as_ref().unwrap().as_str(), "gemini");
        assert_eq!(req.explicit_tier, Some(Tier::High));
        assert_eq!(req.session_id, "s1");
    }

    #[test]
    fn message_new_stamps_time() {
        let before = Utc::now();
        let msg = Message::new(Role::User, "hi");
        assert!(msg.timestamp >= before);
        assert_eq!(msg.role, Role::User);
    }
}
