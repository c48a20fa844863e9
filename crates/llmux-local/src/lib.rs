// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local model provider adapter.
//!
//! Implements [`llmux_core::ProviderClient`] against an Ollama-compatible
//! local inference daemon.

pub mod client;

pub use client::LocalClient;
