//! Shared fixtures for cross-module tests.

mod pipeline;

use crate::embeddings::providers::TrigramProvider;
use crate::embeddings::{EmbeddingProvider, EmbeddingService};
use crate::search::SearchEngine;
use crate::store::stores_from_documents;
use crate::types::{Category, Document};
use campus_core::{AppConfig, AppError, AppResult, MemoryCache};
use campus_llm::{GenerationRequest, GenerationResponse, TextGenerator, TokenUsage};
use std::sync::Arc;

pub(crate) fn doc(
    id: i64,
    category: Category,
    source: &str,
    title: &str,
    body: &str,
) -> Document {
    Document {
        id,
        category,
        title: title.to_string(),
        body: body.to_string(),
        source: source.to_string(),
        start_date: None,
        end_date: None,
        application_method: None,
        examples: None,
        importance: 0,
        active: true,
        embedding: None,
    }
}

/// A small corpus with two documents per category. Every body contains
/// "안내" so an unfiltered keyword search can reach all four stores.
pub(crate) fn sample_corpus() -> Vec<Document> {
    vec![
        doc(
            1,
            Category::AcademicSchedule,
            "1학기 학사일정",
            "수강신청",
            "1학기 수강신청 기간 안내: 2월 10일부터 2월 14일까지입니다",
        ),
        doc(
            2,
            Category::AcademicSchedule,
            "1학기 학사일정",
            "기말고사",
            "기말고사 일정 안내",
        ),
        doc(
            1,
            Category::Notice,
            "학사 공지사항",
            "등록금 납부 안내",
            "등록금 납부 기간은 2월 20일부터 28일까지입니다. 안내 참고.",
        ),
        doc(
            2,
            Category::Notice,
            "학사 공지사항",
            "오리엔테이션",
            "신입생 오리엔테이션 안내",
        ),
        doc(
            1,
            Category::SupportProgram,
            "장학금 프로그램",
            "국가장학금",
            "국가장학금 신청 방법 안내",
        ),
        doc(
            2,
            Category::SupportProgram,
            "장학금 프로그램",
            "멘토링 프로그램",
            "선배 멘토링 프로그램 안내",
        ),
        doc(
            1,
            Category::AcademicInfo,
            "학사 용어 사전",
            "복수전공",
            "두 개의 전공을 이수하는 제도 안내",
        ),
        doc(
            2,
            Category::AcademicInfo,
            "학사 용어 사전",
            "학점",
            "학점 제도 안내",
        ),
    ]
}

/// The sample corpus with trigram embeddings attached, matching what the
/// default embedding service will produce for queries.
pub(crate) async fn corpus_with_embeddings() -> Vec<Document> {
    let provider = TrigramProvider::new(384);
    let mut docs = sample_corpus();
    for doc in &mut docs {
        let embedding = provider.embed(&doc.embedding_text()).await.unwrap();
        doc.embedding = Some(embedding);
    }
    docs
}

pub(crate) fn engine_from_docs(docs: Vec<Document>) -> Arc<SearchEngine> {
    let config = AppConfig::default();
    let cache = Arc::new(MemoryCache::new(true));
    let embeddings = Arc::new(EmbeddingService::new(config.clone(), cache.clone()));
    Arc::new(SearchEngine::new(
        stores_from_documents(docs),
        embeddings,
        cache,
        config.cache_ttl_search,
    ))
}

/// Engine whose embedding provider always fails, for degradation tests.
pub(crate) fn engine_with_broken_embeddings(docs: Vec<Document>) -> Arc<SearchEngine> {
    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait::async_trait]
    impl EmbeddingProvider for FailingProvider {
        fn provider_name(&self) -> &str {
            "failing"
        }
        fn model_name(&self) -> &str {
            "failing-v1"
        }
        fn dimensions(&self) -> usize {
            384
        }
        async fn embed_batch(&self, _texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            Err(AppError::Embedding("provider unavailable".to_string()))
        }
    }

    let config = AppConfig::default();
    let cache = Arc::new(MemoryCache::new(true));
    let embeddings = Arc::new(EmbeddingService::with_provider(
        Arc::new(FailingProvider),
        config.clone(),
        cache.clone(),
    ));
    Arc::new(SearchEngine::new(
        stores_from_documents(docs),
        embeddings,
        cache,
        config.cache_ttl_search,
    ))
}

/// Scripted generator for pipeline tests.
pub(crate) struct MockGenerator {
    pub response: String,
    pub fail: bool,
    pub delay_ms: u64,
}

impl MockGenerator {
    pub(crate) fn returning(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
            delay_ms: 0,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
            delay_ms: 0,
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockGenerator {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> AppResult<GenerationResponse> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail {
            return Err(AppError::Llm("mock generation failure".to_string()));
        }
        Ok(GenerationResponse {
            content: self.response.clone(),
            model: request.model.clone(),
            usage: TokenUsage::new(10, 20),
        })
    }
}
