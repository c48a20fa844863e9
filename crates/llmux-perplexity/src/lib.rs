// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Perplexity provider adapter.
//!
//! Implements [`llmux_core::ProviderClient`] against the Perplexity
//! chat completions API.

pub mod client;
pub mod types;

pub use client::PerplexityClient;
