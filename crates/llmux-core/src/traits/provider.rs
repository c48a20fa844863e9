// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider client trait implemented by each backend adapter crate.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::ProviderId;

/// Uniform interface to one AI backend.
///
/// Implementations issue exactly one request per [`send`](ProviderClient::send)
/// call and translate every backend failure into the fixed [`ProviderError`]
/// taxonomy. They must not retry internally: all retry and fallback policy
/// lives in the router, which also imposes the per-attempt timeout and
/// cancels in-flight calls by dropping the future.
#[async_trait]
pub trait ProviderClient: Send + Sync + 'static {
    /// The registry id this client is registered under.
    fn id(&self) -> &ProviderId;

    /// Sends one prompt to the backend and returns the response text.
    async fn send(&self, prompt: &str) -> Result<String, ProviderError>;
}
