//! Axum route handlers for the master plan and chatbot tabs.
//!
//! Both take the sidebar form as multipart (`name`, `grade`, `target`, `major`,
//! `status`, `files`) plus `selected`, a JSON array of document labels. Leaving
//! `selected` out includes every available document.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::forms::FormData;
use crate::generation::chat::{answer, ChatMessage, ChatReply};
use crate::generation::master_plan::{generate_master_plan, MasterPlan};
use crate::generation::selection::{available_documents, select, AvailableDocument};
use crate::profiles::handlers::profile_input_from_form;
use crate::profiles::models::ProfileInput;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AvailableDocumentsResponse {
    pub documents: Vec<String>,
}

/// POST /api/v1/plans
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    multipart: axum::extract::Multipart,
) -> Result<Json<MasterPlan>, AppError> {
    let form = FormData::read(multipart).await?;
    let (input, documents) = resolve_request(&state, &form)?;

    let plan = generate_master_plan(
        state.generator.as_ref(),
        &state.config.model_pro,
        &input,
        &documents,
    )
    .await?;
    Ok(Json(plan))
}

/// POST /api/v1/chat
///
/// Extra multipart field `messages`: the conversation so far as JSON, ending with
/// the new user question.
pub async fn handle_chat(
    State(state): State<AppState>,
    multipart: axum::extract::Multipart,
) -> Result<Json<ChatReply>, AppError> {
    let form = FormData::read(multipart).await?;
    let (input, documents) = resolve_request(&state, &form)?;
    let history: Vec<ChatMessage> = form.json("messages")?.unwrap_or_default();

    let reply = answer(
        state.generator.as_ref(),
        &state.config.model_flash,
        &input,
        &documents,
        &history,
    )
    .await?;
    Ok(Json(reply))
}

/// POST /api/v1/documents
///
/// Labels the UI should offer as checkboxes for the current form.
pub async fn handle_available_documents(
    State(state): State<AppState>,
    multipart: axum::extract::Multipart,
) -> Result<Json<AvailableDocumentsResponse>, AppError> {
    let form = FormData::read(multipart).await?;
    let (_, documents) = resolve_request(&state, &form)?;
    Ok(Json(AvailableDocumentsResponse {
        documents: documents.into_iter().map(|d| d.label).collect(),
    }))
}

/// Reads the profile fields and resolves the selected documents: saved files of the
/// stored profile with the same name, then this request's uploads.
fn resolve_request(
    state: &AppState,
    form: &FormData,
) -> Result<(ProfileInput, Vec<AvailableDocument>), AppError> {
    let input = profile_input_from_form(form)?;
    for upload in &form.uploads {
        upload.validate()?;
    }

    let stored = if input.name.is_empty() {
        None
    } else {
        state.profiles.get(&input.name)
    };
    let available = available_documents(stored.as_ref(), &form.uploads);
    let selected: Option<Vec<String>> = form.json("selected")?;

    Ok((input, select(available, selected.as_deref())))
}
