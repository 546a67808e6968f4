//! Document stores: one per searchable category, plus the YAML corpus loader.

use crate::embeddings::similarity;
use crate::types::{Category, Document};
use async_trait::async_trait;
use campus_core::AppResult;
use std::cmp::Reverse;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One searchable collection of documents in a single category.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The category every document in this store belongs to.
    fn category(&self) -> Category;

    /// Case-insensitive substring match on title or body.
    /// Ordered by importance descending, then id ascending.
    async fn find_by_keyword(&self, query: &str, limit: usize) -> AppResult<Vec<Document>>;

    /// Nearest documents by rescaled cosine similarity against a query
    /// embedding. Documents without an embedding are skipped.
    async fn find_by_vector(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> AppResult<Vec<(Document, f32)>>;
}

/// In-memory store backed by a `Vec<Document>`.
pub struct MemoryStore {
    category: Category,
    documents: Vec<Document>,
}

impl MemoryStore {
    /// Build a store from documents, keeping only those in `category` and
    /// filling in a default source label where the corpus omitted one.
    pub fn new(category: Category, documents: Vec<Document>) -> Self {
        let documents = documents
            .into_iter()
            .filter(|doc| doc.category == category)
            .map(|mut doc| {
                if doc.source.is_empty() {
                    doc.source = category.label().to_string();
                }
                doc
            })
            .collect();
        Self { category, documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn category(&self) -> Category {
        self.category
    }

    async fn find_by_keyword(&self, query: &str, limit: usize) -> AppResult<Vec<Document>> {
        let query = query.to_lowercase();

        let mut matches: Vec<&Document> = self
            .documents
            .iter()
            .filter(|doc| doc.active)
            .filter(|doc| {
                doc.title.to_lowercase().contains(&query)
                    || doc.body.to_lowercase().contains(&query)
            })
            .collect();

        matches.sort_by_key(|doc| (Reverse(doc.importance), doc.id));
        matches.truncate(limit);

        Ok(matches.into_iter().cloned().collect())
    }

    async fn find_by_vector(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> AppResult<Vec<(Document, f32)>> {
        let mut scored: Vec<(&Document, f32)> = self
            .documents
            .iter()
            .filter(|doc| doc.active)
            .filter_map(|doc| {
                doc.embedding
                    .as_ref()
                    .map(|emb| (doc, similarity(query_embedding, emb)))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.id.cmp(&b.0.id))
        });
        scored.truncate(limit);

        Ok(scored.into_iter().map(|(doc, score)| (doc.clone(), score)).collect())
    }
}

/// Load a corpus of documents from a YAML file.
pub fn load_corpus(path: &Path) -> AppResult<Vec<Document>> {
    let content = std::fs::read_to_string(path)?;
    let documents: Vec<Document> = serde_yaml::from_str(&content)?;
    debug!(count = documents.len(), path = %path.display(), "Loaded corpus");
    Ok(documents)
}

/// Partition documents into one `MemoryStore` per searchable category.
/// Documents marked `Other` are dropped; they have no store to live in.
pub fn stores_from_documents(documents: Vec<Document>) -> Vec<Arc<dyn DocumentStore>> {
    Category::SEARCHABLE
        .iter()
        .map(|&category| {
            let docs: Vec<Document> = documents
                .iter()
                .filter(|doc| doc.category == category)
                .cloned()
                .collect();
            Arc::new(MemoryStore::new(category, docs)) as Arc<dyn DocumentStore>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, category: Category, title: &str, body: &str) -> Document {
        Document {
            id,
            category,
            title: title.to_string(),
            body: body.to_string(),
            source: String::new(),
            start_date: None,
            end_date: None,
            application_method: None,
            examples: None,
            importance: 0,
            active: true,
            embedding: None,
        }
    }

    #[tokio::test]
    async fn test_keyword_search_matches_title_and_body() {
        let store = MemoryStore::new(
            Category::Notice,
            vec![
                doc(1, Category::Notice, "등록금 납부 안내", "납부 기간입니다"),
                doc(2, Category::Notice, "셔틀버스 안내", "등록금과 무관한 공지"),
                doc(3, Category::Notice, "도서관 휴관", "휴관 안내"),
            ],
        );

        let results = store.find_by_keyword("등록금", 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[1].id, 2);
    }

    #[tokio::test]
    async fn test_keyword_search_orders_by_importance_then_id() {
        let mut high = doc(5, Category::Notice, "장학 공지", "내용");
        high.importance = 10;
        let store = MemoryStore::new(
            Category::Notice,
            vec![doc(1, Category::Notice, "장학 공지", "내용"), high],
        );

        let results = store.find_by_keyword("장학", 10).await.unwrap();
        assert_eq!(results[0].id, 5);
        assert_eq!(results[1].id, 1);
    }

    #[tokio::test]
    async fn test_inactive_documents_are_invisible() {
        let mut hidden = doc(1, Category::Notice, "숨김 공지", "내용");
        hidden.active = false;
        hidden.embedding = Some(vec![1.0; 4]);
        let store = MemoryStore::new(Category::Notice, vec![hidden]);

        assert!(store.find_by_keyword("공지", 10).await.unwrap().is_empty());
        assert!(store.find_by_vector(&[1.0; 4], 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vector_search_skips_docs_without_embedding() {
        let mut with_emb = doc(2, Category::AcademicInfo, "복수전공", "정의");
        with_emb.embedding = Some(vec![0.0, 1.0]);
        let store = MemoryStore::new(
            Category::AcademicInfo,
            vec![doc(1, Category::AcademicInfo, "학점", "정의"), with_emb],
        );

        let results = store.find_by_vector(&[0.0, 1.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, 2);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_store_drops_foreign_categories() {
        let store = MemoryStore::new(
            Category::Notice,
            vec![
                doc(1, Category::Notice, "공지", "내용"),
                doc(2, Category::AcademicSchedule, "일정", "내용"),
            ],
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_corpus_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.yaml");
        std::fs::write(
            &path,
            "- id: 1\n  category: support_program\n  source: 장학금 프로그램\n  title: 국가장학금\n  body: 신청 안내\n  application_method: 온라인 신청\n",
        )
        .unwrap();

        let docs = load_corpus(&path).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].category, Category::SupportProgram);
        assert_eq!(docs[0].application_method.as_deref(), Some("온라인 신청"));
        assert!(docs[0].active);
    }

    #[test]
    fn test_load_corpus_missing_file_is_io_error() {
        let err = load_corpus(Path::new("/nonexistent/corpus.yaml")).unwrap_err();
        assert!(matches!(err, campus_core::AppError::Io(_)));
    }

    #[test]
    fn test_stores_from_documents_covers_all_categories() {
        let stores = stores_from_documents(vec![doc(1, Category::Notice, "공지", "내용")]);
        assert_eq!(stores.len(), 4);
        let categories: Vec<Category> = stores.iter().map(|s| s.category()).collect();
        assert_eq!(categories, Category::SEARCHABLE.to_vec());
    }
}
