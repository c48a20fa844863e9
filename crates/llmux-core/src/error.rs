// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the llmux routing engine.

use thiserror::Error;

use crate::types::{Category, Tier};

/// Per-attempt failure taxonomy for provider backends.
///
/// Adapter crates translate every backend-specific failure (HTTP status,
/// connection error, malformed body) into exactly one of these variants.
/// The router treats all of them identically: record the outcome, move to
/// the next candidate. None of them ever crosses the router boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Backend signalled rate limiting (HTTP 429 or equivalent).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Credentials rejected (HTTP 401/403 or equivalent).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Backend could not be reached (connection refused, DNS failure).
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// The attempt exceeded its budget.
    #[error("attempt timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Anything that does not fit the other variants.
    #[error("provider error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Stable short name used in logs and rejection reasons.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::AuthFailed(_) => "auth_failed",
            ProviderError::Unreachable(_) => "unreachable",
            ProviderError::Timeout { .. } => "timeout",
            ProviderError::Unknown(_) => "unknown",
        }
    }
}

/// The primary error type surfaced by llmux to callers.
///
/// Provider-level failures are recovered inside the router's fallback loop
/// and never appear here; only request-fatal conditions do.
#[derive(Debug, Error)]
pub enum LlmuxError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// No registered provider could produce any usable text for the request.
    #[error("no provider available for {tier}/{category} request")]
    NoProviderAvailable { tier: Tier, category: Category },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
