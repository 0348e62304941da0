//! Monthly newsletter content: one generated section per grade.

use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::prompts::{fill, CONSULTANT_PERSONA};
use crate::llm_client::{Content, LlmError, TextGenerator};
use crate::newsletter::prompts::{
    newsletter_subject, newsletter_title, MONTHLY_PLAN_TEMPLATE, SIGNATURE,
};
use crate::profiles::models::Grade;

/// A composed newsletter awaiting review. The body is Markdown and may be edited
/// before sending.
#[derive(Debug, Clone, Serialize)]
pub struct NewsletterDraft {
    pub month: String,
    pub subject: String,
    pub body: String,
    /// Grades whose section could not be generated.
    pub failed_grades: Vec<String>,
}

/// English month name for today, e.g. "January".
pub fn current_month() -> String {
    Local::now().format("%B").to_string()
}

pub async fn generate_monthly_plan(
    generator: &dyn TextGenerator,
    model: &str,
    grade: Grade,
    month: &str,
) -> Result<String, LlmError> {
    let prompt = fill(
        MONTHLY_PLAN_TEMPLATE,
        &[
            ("persona", CONSULTANT_PERSONA),
            ("grade", grade.label()),
            ("month", month),
        ],
    );
    generator.generate(model, &[Content::user_text(prompt)]).await
}

/// Generates every newsletter grade in turn and assembles the full body.
///
/// A grade that fails is replaced by a placeholder section; the draft is still
/// produced. `pause` is slept between grades to stay under the API rate limit.
pub async fn compose_newsletter(
    generator: &dyn TextGenerator,
    model: &str,
    month: &str,
    pause: Duration,
) -> NewsletterDraft {
    let mut body = newsletter_title(month);
    let mut failed_grades = Vec::new();

    for (i, grade) in Grade::NEWSLETTER.into_iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        info!("Generating newsletter section for {grade} ({month})");
        match generate_monthly_plan(generator, model, grade, month).await {
            Ok(content) => {
                body.push_str(&format!("## 📌 {grade}\n{content}\n\n---\n\n"));
            }
            Err(e) => {
                warn!("Error generating {grade}: {e}");
                body.push_str(&format!("## {grade}\n(Content generation failed)\n\n"));
                failed_grades.push(grade.label().to_string());
            }
        }
    }

    body.push_str(SIGNATURE);

    NewsletterDraft {
        month: month.to_string(),
        subject: newsletter_subject(month),
        body,
        failed_grades,
    }
}
