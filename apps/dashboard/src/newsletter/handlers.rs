//! Axum route handlers for the newsletter tab.

use std::time::Duration;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SenderCredentials;
use crate::errors::AppError;
use crate::markdown::markdown_to_html;
use crate::newsletter::logo::load_logo;
use crate::newsletter::mailer::{send_via_smtp, Newsletter, SendReport};
use crate::newsletter::monthly::{
    compose_newsletter, current_month, generate_monthly_plan, NewsletterDraft,
};
use crate::newsletter::prompts::newsletter_subject;
use crate::newsletter::subscribers::parse_email_input;
use crate::newsletter::MailError;
use crate::profiles::models::Grade;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubscribersResponse {
    pub subscribers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSubscribersRequest {
    /// Pasted addresses, comma or newline separated.
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct AddSubscribersResponse {
    pub added: usize,
    pub total: usize,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveSubscribersRequest {
    #[serde(default)]
    pub emails: Vec<String>,
    /// Removes everyone, ignoring `emails`.
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveSubscribersResponse {
    pub removed: bool,
    pub total: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SenderStatusResponse {
    pub sender_email: String,
    pub password_set: bool,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub grade: Grade,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub grade: Grade,
    pub month: String,
    pub content: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// The reviewed (possibly edited) Markdown body.
    pub body: String,
    /// Month the draft was generated for; defaults to the current month.
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    #[serde(flatten)]
    pub report: SendReport,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Subscribers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/subscribers
pub async fn handle_list_subscribers(State(state): State<AppState>) -> Json<SubscribersResponse> {
    Json(SubscribersResponse {
        subscribers: state.subscribers.load(),
    })
}

/// POST /api/v1/subscribers
pub async fn handle_add_subscribers(
    State(state): State<AppState>,
    Json(req): Json<AddSubscribersRequest>,
) -> Result<Json<AddSubscribersResponse>, AppError> {
    if req.input.trim().is_empty() {
        return Err(AppError::Validation("Please enter emails.".to_string()));
    }
    let valid = parse_email_input(&req.input);
    if valid.is_empty() {
        return Err(AppError::Validation(
            "No valid emails found in input.".to_string(),
        ));
    }

    let added = state.subscribers.add(&valid)?;
    let message = if added > 0 {
        format!("Successfully added {added} new subscribers!")
    } else {
        "All valid emails already exist.".to_string()
    };

    Ok(Json(AddSubscribersResponse {
        added,
        total: state.subscribers.load().len(),
        message,
    }))
}

/// DELETE /api/v1/subscribers
pub async fn handle_remove_subscribers(
    State(state): State<AppState>,
    Json(req): Json<RemoveSubscribersRequest>,
) -> Result<Json<RemoveSubscribersResponse>, AppError> {
    let (removed, message) = if req.all {
        (state.subscribers.clear()?, "All subscribers removed.".to_string())
    } else {
        if req.emails.is_empty() {
            return Err(AppError::Validation(
                "Select valid emails to remove.".to_string(),
            ));
        }
        let removed = state.subscribers.remove(req.emails.as_slice())?;
        (removed, format!("Removed {} subscribers.", req.emails.len()))
    };

    Ok(Json(RemoveSubscribersResponse {
        removed,
        total: state.subscribers.load().len(),
        message,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Content and sending
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/newsletter/sender
///
/// Reports the configured sender without exposing the password.
pub async fn handle_sender_status() -> Json<SenderStatusResponse> {
    let sender_email = std::env::var("SENDER_EMAIL").unwrap_or_default();
    let password_set = std::env::var("SENDER_PASSWORD")
        .map(|p| !p.trim().is_empty())
        .unwrap_or(false);
    Json(SenderStatusResponse {
        sender_email,
        password_set,
    })
}

/// POST /api/v1/newsletter/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let month = current_month();
    let content = generate_monthly_plan(
        state.generator.as_ref(),
        &state.config.model_flash,
        req.grade,
        &month,
    )
    .await?;

    Ok(Json(PreviewResponse {
        grade: req.grade,
        month,
        html: markdown_to_html(&content),
        content,
    }))
}

/// POST /api/v1/newsletter/draft
///
/// Generates every grade for the current month. Failed grades are marked in the
/// body and listed in `failed_grades`.
pub async fn handle_draft(State(state): State<AppState>) -> Json<NewsletterDraft> {
    let draft = compose_newsletter(
        state.generator.as_ref(),
        &state.config.model_flash,
        &current_month(),
        Duration::ZERO,
    )
    .await;
    Json(draft)
}

/// POST /api/v1/newsletter/send
///
/// Sends the reviewed body to every subscriber. Credentials are re-read from the
/// configured `.env` first so an updated app password applies immediately.
pub async fn handle_send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<SendResponse>, AppError> {
    if req.body.trim().is_empty() {
        return Err(AppError::Validation("The newsletter body is empty.".to_string()));
    }
    let credentials =
        SenderCredentials::reload(&state.config.env_file).ok_or(MailError::MissingCredentials)?;
    let recipients = state.subscribers.load();
    if recipients.is_empty() {
        return Err(MailError::NoRecipients.into());
    }

    let month = req.month.unwrap_or_else(current_month);
    let subject = newsletter_subject(&month);
    let logo = load_logo(&state.config.logo_path);
    info!(
        "Sending '{}' to {} subscriber(s)",
        subject,
        recipients.len()
    );

    let report = send_via_smtp(
        &state.config.smtp,
        &credentials,
        &recipients,
        &Newsletter {
            subject: &subject,
            markdown: &req.body,
            logo: logo.as_ref(),
        },
    )
    .await?;

    Ok(Json(SendResponse {
        message: report.summary(),
        report,
    }))
}
