// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Azure OpenAI provider adapter.
//!
//! Implements [`llmux_core::ProviderClient`] against the Azure OpenAI
//! chat completions API.

pub mod client;
pub mod types;

pub use client::AzureClient;
