// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter.
//!
//! Implements [`llmux_core::ProviderClient`] against the Generative
//! Language generateContent API.

pub mod client;
pub mod types;

pub use client::GeminiClient;
