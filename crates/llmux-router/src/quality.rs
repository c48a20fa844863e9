// SPDX-FileCopyrightText: 2026 Llmux Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response quality gate.
//!
//! A best-effort heuristic filter, not a correctness oracle: it catches the
//! common failure shapes (empty output, frozen-training-data answers to
//! live questions, canned refusals, answers that contradict configured
//! context facts). False negatives and false positives are both possible
//! and acceptable; the rule tables are configuration data meant to be
//! refreshed externally, not logic to perfect.

use std::collections::BTreeMap;
use std::sync::Arc;

use llmux_config::model::QualityConfig;
use llmux_core::types::Category;

/// Why a candidate response was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Empty or whitespace-only text.
    Empty,
    /// A stale-year marker in a current-data answer.
    StaleYear(String),
    /// A generic refusal phrase.
    Refusal(String),
    /// The response contradicts a configured static context fact.
    ContextMismatch(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "empty response"),
            RejectReason::StaleYear(year) => {
                write!(f, "stale year `{year}` in current-data response")
            }
            RejectReason::Refusal(phrase) => write!(f, "refusal phrase `{phrase}`"),
            RejectReason::ContextMismatch(key) => {
                write!(f, "contradicts static context fact `{key}`")
            }
        }
    }
}

/// Decides whether a candidate response is acceptable or must be discarded.
#[derive(Debug, Clone)]
pub struct ResponseQualityChecker {
    stale_years: Vec<String>,
    refusal_phrases_lower: Vec<String>,
    static_context: Arc<BTreeMap<String, String>>,
}

impl ResponseQualityChecker {
    pub fn new(config: &QualityConfig, static_context: Arc<BTreeMap<String, String>>) -> Self {
        Self {
            stale_years: config.stale_years.clone(),
            refusal_phrases_lower: config
                .refusal_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            static_context,
        }
    }

    /// Checks one candidate response against all rules, returning the first
    /// rule that fires.
    pub fn check(
        &self,
        request_text: &str,
        category: Category,
        candidate: &str,
    ) -> Result<(), RejectReason> {
        if candidate.trim().is_empty() {
            return Err(RejectReason::Empty);
        }

        let candidate_lower = candidate.to_lowercase();

        // A year from the stale list in a current-data answer is a proxy
        // for "answered from frozen training data instead of live knowledge".
        if category == Category::CurrentData {
            for year in &self.stale_years {
                if candidate.contains(year.as_str()) {
                    return Err(RejectReason::StaleYear(year.clone()));
                }
            }
        }

        for phrase in &self.refusal_phrases_lower {
            if candidate_lower.contains(phrase.as_str()) {
                return Err(RejectReason::Refusal(phrase.clone()));
            }
        }

        // Context mismatch: the request asks about a configured fact, the
        // response talks about the same subject but never states the fact.
        let request_lower = request_text.to_lowercase();
        for (key, value) in self.static_context.iter() {
            let key_lower = key.to_lowercase();
            if request_lower.contains(&key_lower)
                && candidate_lower.contains(&key_lower)
                && !candidate_lower.contains(&value.to_lowercase())
            {
                return Err(RejectReason::ContextMismatch(key.clone()));
            }
        }

        Ok(())
    }

    /// Boolean form of [`check`](Self::check).
    pub fn is_acceptable(&self, request_text: &str, category: Category, candidate: &str) -> bool {
        self.check(request_text, category, candidate).is_ok()
    }
}
