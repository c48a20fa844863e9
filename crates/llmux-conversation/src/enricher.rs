// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context enrichment: merges static facts and recent conversation turns
//! into the outbound prompt.

use std::collections::BTreeMap;
use std::sync::Arc;

use llmux_core::types::{EnrichedRequest, Request};

use crate::store::ConversationStore;

/// Builds the prompt actually sent to a provider.
///
/// Static context is process-wide and read-only after construction; the
/// conversation history comes from the store at enrichment time. Enrichment
/// is total (it never fails) and never mutates the original request.
#[derive(Debug, Clone)]
pub struct ContextEnricher {
    store: Arc<ConversationStore>,
    static_context: Arc<BTreeMap<String, String>>,
    history_window: usize,
}

impl ContextEnricher {
    pub fn new(
        store: Arc<ConversationStore>,
        static_context: Arc<BTreeMap<String, String>>,
        history_window: usize,
    ) -> Self {
        Self {
            store,
            static_context,
            history_window,
        }
    }

    /// The static facts this enricher was configured with.
    pub fn static_context(&self) -> &BTreeMap<String, String> {
        &self.static_context
    }

    /// Produces the enriched prompt for one request.
    ///
    /// Layout: static facts first, then the last `history_window` turns,
    /// then the request text. When there are no facts and no history the
    /// prompt is the request text unchanged.
    pub fn enrich(&self, request: &Request) -> EnrichedRequest {
        let history = self
            .store
            .recent_messages(&request.session_id, self.history_window);

        if self.static_context.is_empty() && history.is_empty() {
            return EnrichedRequest {
                prompt: request.text.clone(),
                original: request.clone(),
            };
        }

        let mut prompt = String::new();

        if !self.static_context.is_empty() {
            prompt.push_str("Known context:\n");
            for (key, value) in self.static_context.iter() {
                prompt.push_str(&format!("- {key}: {value}\n"));
            }
            prompt.push('\n');
        }

        if !history.is_empty() {
            prompt.push_str("Recent conversation:\n");
            for msg in &history {
                prompt.push_str(&format!("{}: {}\n", msg.role, msg.content));
            }
            prompt.push('\n');
        }

        prompt.push_str("User request:\n");
        prompt.push_str(&request.text);

        EnrichedRequest {
            prompt,
            original: request.clone(),
        }
    }
}
