//! The end-to-end question answering pipeline.
//!
//! `answer` never returns an error: every failure mode collapses into one
//! of the three response shapes (success, fallback, error) so the caller
//! always has something to show the user.

use crate::classifier::QuestionClassifier;
use crate::fallback::FallbackHandler;
use crate::rag::types::{RagResponse, SourceRef};
use crate::search::SearchEngine;
use crate::types::{Category, SearchResult};
use crate::validator::AnswerValidator;
use campus_llm::{GenerationRequest, TextGenerator};
use campus_prompt::{build_rag_prompt, ContextItem, ContextKind, SYSTEM_PROMPT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// How many documents hybrid search feeds into the prompt.
const SEARCH_LIMIT: usize = 5;
const MAX_ANSWER_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.3;

pub struct RagPipeline {
    classifier: QuestionClassifier,
    engine: Arc<SearchEngine>,
    generator: Arc<dyn TextGenerator>,
    fallback: FallbackHandler,
    validator: AnswerValidator,
    model: String,
    generation_timeout: Duration,
}

impl RagPipeline {
    pub fn new(
        engine: Arc<SearchEngine>,
        generator: Arc<dyn TextGenerator>,
        fallback: FallbackHandler,
        model: impl Into<String>,
        generation_timeout_secs: u64,
    ) -> Self {
        Self {
            classifier: QuestionClassifier::new(),
            engine,
            generator,
            fallback,
            validator: AnswerValidator::new(),
            model: model.into(),
            generation_timeout: Duration::from_secs(generation_timeout_secs),
        }
    }

    /// Answer a question. Infallible by design: search errors, generation
    /// errors, and timeouts all become error responses, and an empty
    /// retrieval becomes a category-appropriate fallback.
    pub async fn answer(&self, question: &str) -> RagResponse {
        let category = self.classifier.classify(question);
        info!(%category, "Answering question");

        // Other means "no usable filter": search everywhere.
        let filter = (category != Category::Other).then_some(category);

        let results = match self.engine.hybrid_search(question, filter, SEARCH_LIMIT).await {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "Search failed");
                return RagResponse::error(
                    self.fallback.error_message(),
                    category,
                    e.to_string(),
                );
            }
        };

        if results.is_empty() {
            info!(%category, "No search results, returning fallback");
            return RagResponse::fallback(self.fallback.message_for(category), category);
        }

        let items: Vec<ContextItem> = results.iter().map(context_item).collect();
        let prompt = match build_rag_prompt(question, &items) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!(error = %e, "Prompt rendering failed");
                return RagResponse::error(
                    self.fallback.error_message(),
                    category,
                    e.to_string(),
                );
            }
        };

        let request = GenerationRequest::new(prompt, &self.model)
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(MAX_ANSWER_TOKENS)
            .with_temperature(TEMPERATURE);

        let generated =
            match tokio::time::timeout(self.generation_timeout, self.generator.generate(&request))
                .await
            {
                Ok(Ok(response)) => response.content,
                Ok(Err(e)) => {
                    error!(error = %e, "Generation failed");
                    return RagResponse::error(
                        self.fallback.error_message(),
                        category,
                        e.to_string(),
                    );
                }
                Err(_) => {
                    error!(
                        timeout_secs = self.generation_timeout.as_secs(),
                        "Generation timed out"
                    );
                    return RagResponse::error(
                        self.fallback.error_message(),
                        category,
                        format!(
                            "generation timed out after {}s",
                            self.generation_timeout.as_secs()
                        ),
                    );
                }
            };

        let sources = extract_sources(&results);
        let report = self.validator.validate(&generated, &sources);
        if !report.is_valid {
            // The answer is returned anyway; the report tells the caller.
            warn!(errors = ?report.errors, "Returning answer that failed validation");
        }

        RagResponse::success(generated, sources, category, results.len(), report)
    }
}

/// Unique source labels in first-seen order.
fn extract_sources(results: &[SearchResult]) -> Vec<SourceRef> {
    let mut sources: Vec<SourceRef> = Vec::new();
    for result in results {
        if !sources.iter().any(|s| s.name == result.source) {
            sources.push(SourceRef {
                name: result.source.clone(),
            });
        }
    }
    sources
}

fn context_item(result: &SearchResult) -> ContextItem {
    let kind = match result.category {
        Category::AcademicSchedule => ContextKind::Schedule,
        Category::SupportProgram => ContextKind::Program,
        Category::AcademicInfo => ContextKind::Glossary,
        // Stored documents always carry a searchable category.
        Category::Notice | Category::Other => ContextKind::Notice,
    };

    ContextItem {
        kind,
        source: result.source.clone(),
        title: result.title.clone(),
        body: result.body.clone(),
        start_date: result.start_date.map(|d| d.to_string()),
        end_date: result.end_date.map(|d| d.to_string()),
        application_method: result.application_method.clone(),
        examples: result.examples.clone(),
    }
}
