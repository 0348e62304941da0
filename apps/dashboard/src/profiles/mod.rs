//! Student profiles: the JSON store plus the save flow that also writes uploads.

pub mod handlers;
pub mod models;
pub mod store;

use crate::documents::{validate_student_name, DocumentStore, Upload};
use crate::errors::AppError;
use models::{ProfileInput, StudentProfile};
use store::ProfileStore;

/// Saves uploads to the student's document directory, then records the profile
/// with the merged file list.
pub fn save_profile(
    profiles: &ProfileStore,
    documents: &DocumentStore,
    input: &ProfileInput,
    uploads: &[Upload],
) -> Result<StudentProfile, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a student name.".to_string(),
        ));
    }
    validate_student_name(&input.name)?;

    let new_files = documents.save_uploads(&input.name, uploads)?;
    Ok(profiles.upsert(input, new_files)?)
}
