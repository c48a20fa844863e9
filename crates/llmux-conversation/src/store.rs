// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory conversation store with per-session append-only message logs.
//!
//! Sessions are keyed by caller-supplied ids and created on first touch.
//! Appends on the same session serialize through the map's entry lock, so
//! message order is the causal order of the exchange; independent sessions
//! live in separate entries and do not contend. Reads copy the requested
//! tail out, so they never hold a lock across caller code.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use llmux_core::types::Message;
use tracing::debug;

/// One conversation session: an append-only message log.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl Conversation {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Owns all conversation sessions for the process lifetime.
///
/// Message logs only grow; there are no in-place edits. Sessions are
/// destroyed only by explicit [`evict`](ConversationStore::evict); the
/// capacity policy deciding *when* to evict lives outside this crate.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: DashMap<String, Conversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Appends one message to a session, creating the session if unknown.
    pub fn append(&self, session_id: &str, message: Message) {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(Conversation::new)
            .messages
            .push(message);
    }

    /// Appends a user/assistant message pair as one atomic unit.
    ///
    /// The pair lands adjacently in the log even when other tasks are
    /// appending to the same session concurrently.
    pub fn append_exchange(&self, session_id: &str, user: Message, assistant: Message) {
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(Conversation::new);
        entry.messages.push(user);
        entry.messages.push(assistant);
        debug!(session_id, total = entry.messages.len(), "appended exchange");
    }

    /// Returns the most recent `max_n` messages in original order.
    ///
    /// Unknown session ids yield an empty vec, never an error.
    pub fn recent_messages(&self, session_id: &str, max_n: usize) -> Vec<Message> {
        match self.sessions.get(session_id) {
            Some(conv) => {
                let msgs = &conv.messages;
                let start = msgs.len().saturating_sub(max_n);
                msgs[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Number of messages in a session; 0 for unknown sessions.
    pub fn message_count(&self, session_id: &str) -> usize {
        self.sessions.get(session_id).map_or(0, |c| c.len())
    }

    /// When the session was created; `None` for unknown sessions.
    pub fn session_created_at(&self, session_id: &str) -> Option<DateTime<Utc>> {
        self.sessions.get(session_id).map(|c| c.created_at())
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Destroys a session and its log. Returns whether it existed.
    pub fn evict(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use llmux_core::types::Role;
    use proptest::prelude::*;

    use super::*;

    fn user_msg(text: &str) -> Message {
        Message::new(Role::User, text)
    }

    #[test]
    fn unknown_session_yields_empty() {
        let store = ConversationStore::new();
        assert!(store.recent_messages("nope", 10).is_empty());
        assert_eq!(store.message_count("nope"), 0);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let store = ConversationStore::new();
        store.append("s", user_msg("one"));
        store.append("s", user_msg("two"));
        store.append("s", user_msg("three"));

        let msgs = store.recent_messages("s", 10);
        let contents: Vec<&str> = msgs.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn recent_messages_returns_tail_in_order() {
        let store = ConversationStore::new();
        for i in 0..5 {
            store.append("s", user_msg(&format!("m{i}")));
        }
        let msgs = store.recent_messages("s", 2);
        let contents: Vec<&str> = msgs.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);
    }

    #[test]
    fn exchange_lands_adjacent() {
        let store = ConversationStore::new();
        store.append_exchange(
            "s",
            user_msg("question"),
            Message::new(Role::Assistant, "answer"),
        );
        let msgs = store.recent_messages("s", 10);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[1].role, Role::Assistant);
    }

    #[test]
    fn session_created_on_first_touch() {
        let store = ConversationStore::new();
        assert!(store.session_created_at("s").is_none());
        store.append("s", user_msg("hi"));
        assert!(store.session_created_at("s").is_some());
    }

    #[test]
    fn evict_destroys_session() {
        let store = ConversationStore::new();
        store.append("s", user_msg("hi"));
        assert_eq!(store.session_count(), 1);
        assert!(store.evict("s"));
        assert!(!store.evict("s"));
        assert!(store.recent_messages("s", 10).is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_sessions_stay_isolated() {
        let store = Arc::new(ConversationStore::new());

        let mut handles = Vec::new();
        for session in ["a", "b", "c", "d"] {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    store.append(session, Message::new(Role::User, format!("{session}-{i}")));
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        for session in ["a", "b", "c", "d"] {
            let msgs = store.recent_messages(session, 1000);
            assert_eq!(msgs.len(), 100);
            // Per-session order preserved, no cross-session leakage.
            for (i, msg) in msgs.iter().enumerate() {
                assert_eq!(msg.content, format!("{session}-{i}"));
            }
        }
    }

    proptest! {
        #[test]
        fn round_trip_any_prefix(contents in prop::collection::vec("[a-z]{1,8}", 0..20), n in 0usize..25) {
            let store = ConversationStore::new();
            for c in &contents {
                store.append("s", Message::new(Role::User, c.clone()));
            }
            let msgs = store.recent_messages("s", n);
            let expected: Vec<&String> =
                contents.iter().skip(contents.len().saturating_sub(n)).collect();
            let got: Vec<&String> = msgs.iter().map(|m| &m.content).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
