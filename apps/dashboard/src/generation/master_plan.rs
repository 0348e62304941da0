//! Master plan generation.
//!
//! Flow: validate profile → fill prompt → append document parts → pro model →
//! clean stray markup → return Markdown.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::attachments::build_parts;
use crate::generation::prompts::MASTER_PLAN_TEMPLATE;
use crate::generation::selection::AvailableDocument;
use crate::llm_client::prompts::{fill, CONSULTANT_PERSONA};
use crate::llm_client::{Content, Part, TextGenerator};
use crate::markdown::markdown_to_html;
use crate::profiles::models::ProfileInput;

#[derive(Debug, Clone, Serialize)]
pub struct MasterPlan {
    pub markdown: String,
    /// `markdown` rendered for display.
    pub html: String,
    /// Labels of the documents included in the prompt.
    pub documents_used: Vec<String>,
    pub model: String,
}

/// Builds the single user turn: the filled prompt followed by one part per document.
pub fn build_master_plan_contents(
    input: &ProfileInput,
    documents: &[AvailableDocument],
) -> Content {
    let prompt = fill(
        MASTER_PLAN_TEMPLATE,
        &[
            ("persona", CONSULTANT_PERSONA),
            ("name", input.name.trim()),
            ("grade", input.grade.label()),
            ("target", &input.target),
            ("major", &input.major),
            ("status", &input.status),
        ],
    );

    let sources: Vec<_> = documents.iter().map(|d| d.source.clone()).collect();
    let mut parts = vec![Part::Text(prompt)];
    parts.extend(build_parts(&sources));
    Content::user(parts)
}

pub async fn generate_master_plan(
    generator: &dyn TextGenerator,
    model: &str,
    input: &ProfileInput,
    documents: &[AvailableDocument],
) -> Result<MasterPlan, AppError> {
    if input.name.trim().is_empty() || input.status.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter student profile and summary first.".to_string(),
        ));
    }

    if documents.is_empty() {
        info!(
            "No documents selected for '{}'; generating from profile text only",
            input.name.trim()
        );
    }

    let contents = [build_master_plan_contents(input, documents)];
    info!(
        "Generating master plan for '{}' with {} part(s) on {}",
        input.name.trim(),
        contents[0].parts.len(),
        model
    );
    let text = generator.generate(model, &contents).await?;

    let markdown = clean_model_markup(&text);
    Ok(MasterPlan {
        html: markdown_to_html(&markdown),
        markdown,
        documents_used: documents.iter().map(|d| d.label.clone()).collect(),
        model: model.to_string(),
    })
}

/// Repairs a malformed line-break tag the model sometimes emits inside tables.
pub fn clean_model_markup(text: &str) -> String {
    text.replace("<br->", "<br>- ")
}
