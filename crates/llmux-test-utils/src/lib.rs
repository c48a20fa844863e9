// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the llmux workspace.
//!
//! Provides [`MockProvider`], a scripted `ProviderClient` implementation
//! for deterministic, network-free router tests.

pub mod mock_provider;

pub use mock_provider::{MockBehavior, MockProvider};
