// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock provider client for deterministic testing.
//!
//! `MockProvider` implements `ProviderClient` with a scripted FIFO of
//! behaviors, enabling fast, CI-runnable router tests without external
//! API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use llmux_core::error::ProviderError;
use llmux_core::traits::ProviderClient;
use llmux_core::types::ProviderId;
use tokio::sync::Mutex;

/// One scripted behavior for a `send` call.
#[derive(Debug)]
pub enum MockBehavior {
    /// Return this text.
    Respond(String),
    /// Return this error.
    Fail(ProviderError),
    /// Sleep long enough to trip any reasonable attempt timeout,
    /// then respond. Exercises the router's timeout path.
    Stall(Duration, String),
}

/// A mock backend that plays back a scripted behavior queue.
///
/// Behaviors are popped FIFO; when the queue is empty, the fallback text
/// is returned (default "mock response"). The call counter lets tests
/// assert attempt counts.
pub struct MockProvider {
    id: ProviderId,
    script: Mutex<VecDeque<MockBehavior>>,
    fallback: String,
    calls: AtomicUsize,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a mock with an empty script and the default fallback text.
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Self::always(id, "mock response")
    }

    /// Create a mock whose every unscripted call answers `text`.
    pub fn always(id: impl Into<String>, text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: ProviderId::new(id),
            script: Mutex::new(VecDeque::new()),
            fallback: text.into(),
            calls: AtomicUsize::new(0),
            prompts: std::sync::Mutex::new(Vec::new()),
        })
    }

    /// Queue a successful response.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(MockBehavior::Respond(text.into()));
    }

    /// Queue a failure.
    pub async fn push_error(&self, err: ProviderError) {
        self.script.lock().await.push_back(MockBehavior::Fail(err));
    }

    /// Queue a stalled response.
    pub async fn push_stall(&self, delay: Duration, text: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(MockBehavior::Stall(delay, text.into()));
    }

    /// Number of `send` calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    async fn send(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        let behavior = self.script.lock().await.pop_front();
        match behavior {
            Some(MockBehavior::Respond(text)) => Ok(text),
            Some(MockBehavior::Fail(err)) => Err(err),
            Some(MockBehavior::Stall(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_script_returns_default() {
        let mock = MockProvider::new("m");
        assert_eq!(mock.send("hi").await.unwrap(), "mock response");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn always_pins_the_fallback() {
        let mock = MockProvider::always("m", "It is 2025");
        assert_eq!(mock.send("a").await.unwrap(), "It is 2025");
        assert_eq!(mock.send("b").await.unwrap(), "It is 2025");
    }

    #[tokio::test]
    async fn script_plays_back_in_order() {
        let mock = MockProvider::new("m");
        mock.push_response("first").await;
        mock.push_error(ProviderError::RateLimited("slow down".into()))
            .await;
        mock.push_response("third").await;

        assert_eq!(mock.send("a").await.unwrap(), "first");
        assert!(matches!(
            mock.send("b").await,
            Err(ProviderError::RateLimited(_))
        ));
        assert_eq!(mock.send("c").await.unwrap(), "third");
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn id_matches_construction() {
        let mock = MockProvider::new("gemini");
        assert_eq!(mock.id().as_str(), "gemini");
    }
}
