//! Response types returned by the RAG pipeline.

use crate::types::Category;
use crate::validator::ValidationReport;
use serde::{Deserialize, Serialize};

/// Reference to a document collection an answer drew on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
}

/// Final answer envelope. Exactly one of three shapes:
/// a composed answer (`success`), a canned fallback (`is_fallback`),
/// or an error (`success: false` with `error` set).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub category: Category,
    pub search_results_count: usize,
    pub success: bool,
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl RagResponse {
    pub fn success(
        answer: String,
        sources: Vec<SourceRef>,
        category: Category,
        search_results_count: usize,
        validation: ValidationReport,
    ) -> Self {
        Self {
            answer,
            sources,
            category,
            search_results_count,
            success: true,
            is_fallback: false,
            error: None,
            validation: Some(validation),
        }
    }

    /// Canned answer for a question retrieval found nothing for.
    /// Fallbacks are successful responses: the user still got an answer.
    pub fn fallback(answer: String, category: Category) -> Self {
        Self {
            answer,
            sources: Vec::new(),
            category,
            search_results_count: 0,
            success: true,
            is_fallback: true,
            error: None,
            validation: None,
        }
    }

    pub fn error(answer: String, category: Category, message: String) -> Self {
        Self {
            answer,
            sources: Vec::new(),
            category,
            search_results_count: 0,
            success: false,
            is_fallback: false,
            error: Some(message),
            validation: None,
        }
    }
}
