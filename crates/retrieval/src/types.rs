//! Core domain types: categories, corpus documents, and search results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Question and document categories.
///
/// The four searchable categories each map to one document store;
/// `Other` means "no specific store" and widens a search to all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AcademicSchedule,
    Notice,
    SupportProgram,
    AcademicInfo,
    Other,
}

impl Category {
    /// Categories that have a backing document store, in display order.
    pub const SEARCHABLE: [Category; 4] = [
        Category::AcademicSchedule,
        Category::Notice,
        Category::SupportProgram,
        Category::AcademicInfo,
    ];

    /// Human-readable Korean label.
    pub fn label(self) -> &'static str {
        match self {
            Category::AcademicSchedule => "학사 일정",
            Category::Notice => "공지사항",
            Category::SupportProgram => "지원 프로그램",
            Category::AcademicInfo => "신입생 기본 정보",
            Category::Other => "기타",
        }
    }

    /// Position in `SEARCHABLE`, used as a deterministic sort tie-break.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Category::AcademicSchedule => 0,
            Category::Notice => 1,
            Category::SupportProgram => 2,
            Category::AcademicInfo => 3,
            Category::Other => 4,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One corpus document as loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub body: String,
    /// Display label of the collection this document came from.
    /// Defaults to the category label when the corpus omits it.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub application_method: Option<String>,
    #[serde(default)]
    pub examples: Option<String>,
    /// Editorial weight used to order keyword matches within a store.
    #[serde(default)]
    pub importance: i32,
    /// Inactive documents are invisible to every search path.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Precomputed embedding. Documents without one are skipped by
    /// vector search but still reachable by keyword search.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

fn default_active() -> bool {
    true
}

impl Document {
    /// Text used when embedding this document.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// One scored hit from any of the search paths.
///
/// `relevance_score` is only meaningful after keyword search, `similarity`
/// after vector search, and `final_score` after hybrid fusion; the other
/// fields stay at their zero defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub category: Category,
    pub source: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub application_method: Option<String>,
    #[serde(default)]
    pub examples: Option<String>,
    #[serde(default)]
    pub relevance_score: u32,
    #[serde(default)]
    pub similarity: f32,
    #[serde(default)]
    pub final_score: f32,
}

impl SearchResult {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id,
            category: doc.category,
            source: doc.source.clone(),
            title: doc.title.clone(),
            body: doc.body.clone(),
            start_date: doc.start_date,
            end_date: doc.end_date,
            application_method: doc.application_method.clone(),
            examples: doc.examples.clone(),
            relevance_score: 0,
            similarity: 0.0,
            final_score: 0.0,
        }
    }

    /// Identity key for cross-store deduplication. Document ids are only
    /// unique within a category, so the key carries both.
    pub fn key(&self) -> (Category, i64) {
        (self.category, self.id)
    }
}
