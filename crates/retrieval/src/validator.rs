//! Post-generation answer validation.
//!
//! Checks a generated answer for length problems, speculative language,
//! and prohibited personal-opinion phrasing. Validation never rewrites
//! the answer; it produces a report the caller attaches to the response.

use crate::rag::SourceRef;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Answers shorter than this (in characters) are rejected.
const MIN_ANSWER_CHARS: usize = 10;
/// Answers longer than this draw a warning but remain valid.
const MAX_ANSWER_CHARS: usize = 2000;

/// Hedging language that signals the model is guessing.
const SPECULATIVE_PHRASES: [&str; 9] = [
    "아마도",
    "추측",
    "~일 것",
    "~같습니다",
    "확실하지 않지만",
    "~인 것 같",
    "~로 보입니다",
    "예상",
    "짐작",
];

/// Personal-judgment phrasing the assistant must never use.
const PROHIBITED_PHRASES: [&str; 4] = [
    "제가 판단하기에",
    "개인적으로",
    "~하는 게 좋을 것 같아요",
    "~하면 안 될 것 같아요",
];

/// Markers of an actionable next step.
const ACTION_MARKERS: [&str; 4] = ["신청", "방법", "확인", "준비"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False only when at least one error was found.
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Answer length in characters, not bytes.
    pub answer_length: usize,
    pub sources_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerValidator;

impl AnswerValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, answer: &str, sources: &[SourceRef]) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if sources.is_empty() {
            warnings.push("출처가 명시되지 않았습니다".to_string());
        }

        let answer_length = answer.chars().count();
        if answer_length < MIN_ANSWER_CHARS {
            errors.push("답변이 너무 짧습니다".to_string());
        }
        if answer_length > MAX_ANSWER_CHARS {
            warnings.push("답변이 너무 깁니다 (2000자 초과)".to_string());
        }

        for phrase in SPECULATIVE_PHRASES {
            if answer.contains(phrase) {
                warnings.push(format!("추측성 표현 발견: '{}'", phrase));
            }
        }

        for phrase in PROHIBITED_PHRASES {
            if answer.contains(phrase) {
                errors.push(format!("금지된 표현 발견: '{}'", phrase));
            }
        }

        if !ACTION_MARKERS.iter().any(|marker| answer.contains(marker)) {
            warnings.push("행동 가이드가 명시적이지 않을 수 있습니다".to_string());
        }

        let is_valid = errors.is_empty();
        if !is_valid {
            warn!(?errors, "Answer failed validation");
        }

        ValidationReport {
            is_valid,
            errors,
            warnings,
            answer_length,
            sources_count: sources.len(),
        }
    }
}
