// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loading and validation for the llmux router.
//!
//! Layered TOML config (XDG hierarchy) with `LLMUX_` environment variable
//! overrides, strict unknown-key rejection, and a post-load validation pass.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::LlmuxConfig;
pub use validation::validate_config;
