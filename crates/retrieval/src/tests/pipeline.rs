//! Pipeline behavior: the three response shapes and validation passthrough.

use super::*;
use crate::fallback::FallbackHandler;
use crate::rag::RagPipeline;
use crate::types::Category;

const VALID_ANSWER: &str =
    "수강신청은 2월 10일부터 14일까지입니다. 학사시스템에서 신청 방법을 확인하세요. (출처: 1학기 학사일정)";

fn pipeline(
    engine: Arc<crate::search::SearchEngine>,
    generator: MockGenerator,
    timeout_secs: u64,
) -> RagPipeline {
    RagPipeline::new(
        engine,
        Arc::new(generator),
        FallbackHandler::new("02-970-XXXX"),
        "llama3.2",
        timeout_secs,
    )
}

#[tokio::test]
async fn test_successful_answer_carries_sources_and_validation() {
    let engine = engine_from_docs(corpus_with_embeddings().await);
    let pipeline = pipeline(engine, MockGenerator::returning(VALID_ANSWER), 30);

    let response = pipeline.answer("수강신청은 언제 하나요?").await;

    assert!(response.success);
    assert!(!response.is_fallback);
    assert_eq!(response.category, Category::AcademicSchedule);
    assert_eq!(response.answer, VALID_ANSWER);
    assert!(response.search_results_count >= 1);
    assert!(response
        .sources
        .iter()
        .any(|s| s.name == "1학기 학사일정"));

    let validation = response.validation.expect("validation report attached");
    assert!(validation.is_valid);
}

#[tokio::test]
async fn test_empty_retrieval_returns_category_fallback() {
    let engine = engine_from_docs(Vec::new());
    let pipeline = pipeline(engine, MockGenerator::returning(VALID_ANSWER), 30);

    let response = pipeline.answer("장학금 신청 방법이 궁금해요").await;

    assert!(response.success);
    assert!(response.is_fallback);
    assert_eq!(response.category, Category::SupportProgram);
    assert!(response.answer.contains("지원 프로그램 정보를 찾을 수 없어요"));
    assert!(response.sources.is_empty());
    assert_eq!(response.search_results_count, 0);
    assert!(response.validation.is_none());
}

#[tokio::test]
async fn test_unclassifiable_question_gets_general_fallback() {
    let engine = engine_from_docs(Vec::new());
    let pipeline = pipeline(engine, MockGenerator::returning(VALID_ANSWER), 30);

    let response = pipeline.answer("오늘 날씨 어때요?").await;

    assert!(response.is_fallback);
    assert_eq!(response.category, Category::Other);
    assert!(response.answer.contains("질문을 다르게 표현해보세요"));
}

#[tokio::test]
async fn test_generation_failure_becomes_error_response() {
    let engine = engine_from_docs(corpus_with_embeddings().await);
    let pipeline = pipeline(engine, MockGenerator::failing(), 30);

    let response = pipeline.answer("수강신청은 언제 하나요?").await;

    assert!(!response.success);
    assert!(!response.is_fallback);
    assert!(response.answer.contains("일시적인 오류가 발생했어요"));
    assert!(response
        .error
        .as_deref()
        .is_some_and(|e| e.contains("mock generation failure")));
}

#[tokio::test]
async fn test_generation_timeout_becomes_error_response() {
    let engine = engine_from_docs(corpus_with_embeddings().await);
    let slow = MockGenerator {
        response: VALID_ANSWER.to_string(),
        fail: false,
        delay_ms: 200,
    };
    let pipeline = pipeline(engine, slow, 0);

    let response = pipeline.answer("수강신청은 언제 하나요?").await;

    assert!(!response.success);
    assert!(response
        .error
        .as_deref()
        .is_some_and(|e| e.contains("timed out")));
}

#[tokio::test]
async fn test_invalid_answer_is_returned_with_failing_report() {
    let engine = engine_from_docs(corpus_with_embeddings().await);
    // Too short: validation rejects it, but the answer still goes out.
    let pipeline = pipeline(engine, MockGenerator::returning("네."), 30);

    let response = pipeline.answer("수강신청은 언제 하나요?").await;

    assert!(response.success);
    assert_eq!(response.answer, "네.");
    let validation = response.validation.expect("validation report attached");
    assert!(!validation.is_valid);
    assert!(validation.errors.iter().any(|e| e.contains("너무 짧습니다")));
}
