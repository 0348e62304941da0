//! Axum route handlers for the profile sidebar.

use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::forms::FormData;
use crate::profiles::models::{Grade, ProfileInput, StudentProfile};
use crate::profiles::save_profile;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StudentListResponse {
    pub students: Vec<String>,
    pub grades: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct StudentResponse {
    pub name: String,
    #[serde(flatten)]
    pub profile: StudentProfile,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub name: String,
    pub file_count: usize,
    pub message: String,
    pub profile: StudentProfile,
}

#[derive(Debug, Serialize)]
pub struct SavedFilesResponse {
    pub files: Vec<String>,
}

/// GET /api/v1/students
pub async fn handle_list_students(State(state): State<AppState>) -> Json<StudentListResponse> {
    Json(StudentListResponse {
        students: state.profiles.names(),
        grades: Grade::ALL.iter().map(|g| g.label()).collect(),
    })
}

/// GET /api/v1/students/:name
pub async fn handle_get_student(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StudentResponse>, AppError> {
    let profile = state
        .profiles
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("Student '{name}' not found")))?;
    Ok(Json(StudentResponse { name, profile }))
}

/// POST /api/v1/students
///
/// Multipart: `name`, `grade`, `target`, `major`, `status`, and any number of `files`.
pub async fn handle_save_student(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SaveProfileResponse>, AppError> {
    let form = FormData::read(multipart).await?;
    let input = profile_input_from_form(&form)?;

    let profile = save_profile(&state.profiles, &state.documents, &input, &form.uploads)?;
    let name = input.name.trim().to_string();

    Ok(Json(SaveProfileResponse {
        message: format!(
            "Saved profile & {} files for '{}'!",
            profile.files.len(),
            name
        ),
        file_count: profile.files.len(),
        name,
        profile,
    }))
}

/// DELETE /api/v1/students/:name
pub async fn handle_delete_student(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.profiles.delete(&name, &state.documents)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Student '{name}' not found")))
    }
}

/// GET /api/v1/students/:name/files
///
/// Base names of the saved documents, in the order they were added.
pub async fn handle_saved_files(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SavedFilesResponse>, AppError> {
    let profile = state
        .profiles
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("Student '{name}' not found")))?;
    let files = profile.files.iter().map(|p| base_name(p)).collect();
    Ok(Json(SavedFilesResponse { files }))
}

pub fn base_name(path: &str) -> String {
    FsPath::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Reads the sidebar fields. An unknown grade label is rejected.
pub fn profile_input_from_form(form: &FormData) -> Result<ProfileInput, AppError> {
    let grade = match form.text("grade").map(str::trim).filter(|g| !g.is_empty()) {
        Some(label) => Grade::parse(label)
            .ok_or_else(|| AppError::Validation(format!("Unknown grade '{label}'")))?,
        None => Grade::default(),
    };

    Ok(ProfileInput {
        name: form.text("name").unwrap_or_default().trim().to_string(),
        grade,
        target: form.text("target").unwrap_or_default().to_string(),
        major: form.text("major").unwrap_or_default().to_string(),
        status: form.text("status").unwrap_or_default().to_string(),
    })
}
