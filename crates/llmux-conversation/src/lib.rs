// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state for the llmux router.
//!
//! This crate provides:
//! - [`ConversationStore`]: per-session append-only message logs
//! - [`ContextEnricher`]: merges static facts and recent turns into the
//!   outbound prompt
//!
//! Everything here is in-memory for the process lifetime; durability, if
//! needed, is an external snapshotting concern.

pub mod enricher;
pub mod store;

pub use enricher::ContextEnricher;
pub use store::{Conversation, ConversationStore};
