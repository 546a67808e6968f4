//! Prompt builder: context formatting and template rendering.

use crate::templates::RAG_PROMPT_TEMPLATE;
use campus_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Which field labels a context document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Academic schedule: 이름 / 설명
    Schedule,
    /// Notice: 제목 / 내용
    Notice,
    /// Support program: 이름 / 설명
    Program,
    /// Glossary entry: 용어 / 정의
    Glossary,
}

impl ContextKind {
    fn title_label(self) -> &'static str {
        match self {
            Self::Schedule | Self::Program => "이름",
            Self::Notice => "제목",
            Self::Glossary => "용어",
        }
    }

    fn body_label(self) -> &'static str {
        match self {
            Self::Schedule | Self::Program => "설명",
            Self::Notice => "내용",
            Self::Glossary => "정의",
        }
    }
}

/// One retrieved document, ready to be rendered into the prompt.
#[derive(Debug, Clone)]
pub struct ContextItem {
    pub kind: ContextKind,
    pub source: String,
    pub title: String,
    pub body: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub application_method: Option<String>,
    pub examples: Option<String>,
}

/// Format context items into numbered `[문서 N]` blocks.
pub fn format_context(items: &[ContextItem]) -> String {
    let mut formatted = String::new();

    for (idx, item) in items.iter().enumerate() {
        formatted.push_str(&format!("[문서 {}]\n", idx + 1));
        formatted.push_str(&format!("출처: {}\n", item.source));
        formatted.push_str(&format!("{}: {}\n", item.kind.title_label(), item.title));
        formatted.push_str(&format!("{}: {}\n", item.kind.body_label(), item.body));

        if let Some(ref start) = item.start_date {
            formatted.push_str(&format!("시작일: {}\n", start));
        }
        if let Some(ref end) = item.end_date {
            formatted.push_str(&format!("종료일: {}\n", end));
        }
        if let Some(ref method) = item.application_method {
            formatted.push_str(&format!("신청 방법: {}\n", method));
        }
        if let Some(ref examples) = item.examples {
            formatted.push_str(&format!("예시: {}\n", examples));
        }

        formatted.push('\n');
    }

    formatted
}

/// Build the full RAG prompt from a question and its retrieved context.
pub fn build_rag_prompt(question: &str, items: &[ContextItem]) -> AppResult<String> {
    tracing::debug!("Building RAG prompt with {} context items", items.len());

    let mut variables = HashMap::new();
    variables.insert("context".to_string(), format_context(items));
    variables.insert("question".to_string(), question.to_string());

    render_template(RAG_PROMPT_TEMPLATE, &variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
