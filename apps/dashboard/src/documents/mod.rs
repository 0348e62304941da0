//! Uploaded student documents on disk.
//!
//! Layout: `<docs_dir>/<student name>/<file name>`. Paths are recorded verbatim in
//! the profile store; nothing keeps the two in sync, so a file deleted by hand
//! leaves a dangling path behind.

pub mod docx;
pub mod mime;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::StoreError;

/// Extensions accepted by the uploader.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "docx", "doc", "xlsx", "xls", "csv", "txt",
];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid student name: {0:?}")]
    InvalidStudentName(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A file received from the browser in the current request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    /// Content type sent by the client, if any.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    /// The final path component of the client-supplied name.
    pub fn file_name(&self) -> &str {
        file_name_of(&self.name)
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(self.file_name())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Rejects names that reduce to nothing and extensions outside the accepted set.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let name = self.file_name();
        if name.is_empty() || name == "." || name == ".." {
            return Err(DocumentError::UnsupportedType(self.name.clone()));
        }
        match self.extension() {
            Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err(DocumentError::UnsupportedType(name.to_string())),
        }
    }
}

/// Strips any directory components a browser (or a hostile client) sent along.
pub fn file_name_of(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim()
}

/// Student names double as directory names.
pub fn validate_student_name(name: &str) -> Result<(), DocumentError> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\', '\0']);
    if bad {
        return Err(DocumentError::InvalidStudentName(name.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn student_dir(&self, student: &str) -> PathBuf {
        self.root.join(student.trim())
    }

    /// Writes each upload into the student's directory and returns the saved paths
    /// in upload order. A file with the same name is overwritten.
    pub fn save_uploads(
        &self,
        student: &str,
        uploads: &[Upload],
    ) -> Result<Vec<String>, DocumentError> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }
        validate_student_name(student)?;
        for upload in uploads {
            upload.validate()?;
        }

        let dir = self.student_dir(student);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut saved = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let path = dir.join(upload.file_name());
            std::fs::write(&path, &upload.data).map_err(|e| StoreError::io(&path, e))?;
            saved.push(path.to_string_lossy().into_owned());
        }

        info!("Saved {} document(s) for '{}'", saved.len(), student.trim());
        Ok(saved)
    }

    /// Removes the student's directory if present. Failures are logged only.
    pub fn remove_student_dir(&self, student: &str) {
        if validate_student_name(student).is_err() {
            return;
        }
        let dir = self.student_dir(student);
        if !dir.exists() {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&dir) {
            warn!("Error deleting directory {}: {e}", dir.display());
        }
    }
}
