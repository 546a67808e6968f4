//! Keyword-table question classifier.
//!
//! A question is scored against a fixed keyword table per category; the
//! category with the most keyword hits wins, ties going to the earlier
//! table entry. No hits at all classify as `Other`.

use crate::types::Category;
use tracing::debug;

/// Keyword table in priority order. Matching is substring containment on
/// the lowercased question, so compound words ("복수전공") also hit their
/// parts ("전공").
const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::AcademicSchedule,
        &["수강신청", "등록금", "휴학", "복학", "시험", "성적", "일정", "기간"],
    ),
    (Category::Notice, &["공지", "안내", "발표", "알림"]),
    (
        Category::SupportProgram,
        &["장학금", "비교과", "멘토링", "취업", "프로그램", "지원"],
    ),
    (
        Category::AcademicInfo,
        &["학점", "전공", "복수전공", "부전공", "용어", "제도", "규정"],
    ),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionClassifier;

impl QuestionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a question into one category.
    pub fn classify(&self, question: &str) -> Category {
        let question = question.to_lowercase();

        let mut best = Category::Other;
        let mut best_hits = 0usize;

        for (category, keywords) in CATEGORY_KEYWORDS {
            let hits = keywords.iter().filter(|kw| question.contains(*kw)).count();
            // Strictly greater: first table entry wins ties.
            if hits > best_hits {
                best = category;
                best_hits = hits;
            }
        }

        debug!(category = %best, hits = best_hits, "Classified question");
        best
    }
}
