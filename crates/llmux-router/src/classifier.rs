// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic request classification.
//!
//! Classifies request text into a [`RouteHint`] (complexity tier + content
//! category) using fixed keyword tables and length bands. Zero-cost, no
//! network, no hidden state: the same input always yields the same hint.

use llmux_core::types::{Category, RouteHint, Tier};

/// Current-data indicator patterns (contains, case-insensitive).
/// Checked first; requests about live facts must not be answered from
/// frozen training data.
const CURRENT_DATA_TERMS: &[&str] = &[
    "news", "latest", "today", "tonight", "right now", "current", "currently",
    "price", "stock", "weather", "net worth", "what year", "what time",
    "this week", "this month", "breaking", "live score",
];

/// Technical indicator patterns (contains, case-insensitive). Checked second.
const TECHNICAL_TERMS: &[&str] = &[
    "code", "function", "algorithm", "debug", "compile", "compiler",
    "stack trace", "exception", "api", "sql", "regex", "refactor",
    "unit test", "rust", "python", "javascript", "segfault",
];

/// Complex-reasoning indicator patterns (contains, case-insensitive).
/// Checked last before the General fallback.
const COMPLEX_REASONING_TERMS: &[&str] = &[
    "explain", "compare", "analyze", "analyse", "evaluate", "theory",
    "prove", "trade-off", "tradeoff", "pros and cons", "philosophy",
    "implications", "step by step", "in depth",
];

/// Word-count bands for length-based tier inference.
const SHORT_REQUEST_WORDS: usize = 8;
const LONG_REQUEST_WORDS: usize = 50;

/// Heuristic request classifier.
///
/// Total and side-effect free: unclassifiable input defaults to
/// `{Low, General}`, and concurrent callers are safe because there is no
/// state at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestClassifier;

impl RequestClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classifies request text into a routing hint.
    ///
    /// Category detection order is significant and fixed: current-data
    /// terms first, then technical, then complex-reasoning; first match
    /// wins, no match falls through to General. An explicit tier override
    /// always wins; otherwise category keywords take precedence over
    /// length-based inference.
    pub fn classify(&self, text: &str, explicit_tier: Option<Tier>) -> RouteHint {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return RouteHint {
                tier: explicit_tier.unwrap_or(Tier::Low),
                category: Category::General,
            };
        }

        let lower = trimmed.to_lowercase();
        let category = Self::detect_category(&lower);

        let tier = match explicit_tier {
            Some(tier) => tier,
            None => Self::infer_tier(category, trimmed),
        };

        RouteHint { tier, category }
    }

    fn detect_category(lower: &str) -> Category {
        if CURRENT_DATA_TERMS.iter().any(|t| lower.contains(t)) {
            Category::CurrentData
        } else if TECHNICAL_TERMS.iter().any(|t| lower.contains(t)) {
            Category::Technical
        } else if COMPLEX_REASONING_TERMS.iter().any(|t| lower.contains(t)) {
            Category::ComplexReasoning
        } else {
            Category::General
        }
    }

    fn infer_tier(category: Category, trimmed: &str) -> Tier {
        let length_tier = Self::length_tier(trimmed.split_whitespace().count());
        match category {
            // Keyword-implied floors take precedence over length.
            Category::ComplexReasoning => Tier::High,
            Category::Technical | Category::CurrentData => Tier::Medium.max(length_tier),
            Category::General => length_tier,
        }
    }

    fn length_tier(word_count: usize) -> Tier {
        if word_count <= SHORT_REQUEST_WORDS {
            Tier::Low
        } else if word_count <= LONG_REQUEST_WORDS {
            Tier::Medium
        } else {
            Tier::High
        }
    }
}
