// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the llmux routing engine.
//!
//! This crate provides the shared types, the error taxonomy, and the
//! [`ProviderClient`] trait that backend adapter crates implement. It does
//! no I/O of its own.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{LlmuxError, ProviderError};
pub use traits::ProviderClient;
pub use types::{
    Category, EnrichedRequest, Message, Outcome, ProviderId, ProviderProfile, Request,
    RouteHint, Role, Tier,
};
