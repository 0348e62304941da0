//! Content types for documents sent to the model as inline blobs.

use std::path::Path;

pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF: &str = "application/pdf";
const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for a saved document, guessed from its extension.
/// Anything not in the table is sent as PDF.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => PDF,
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "doc" => "application/msword",
        "docx" => DOCX,
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "csv" => "text/csv",
        "txt" => "text/plain",
        _ => PDF,
    }
}

/// Content type for a fresh upload: the client's type unless it is missing or
/// generic, otherwise a guess from the file name.
pub fn upload_content_type(name: &str, declared: Option<&str>) -> String {
    declared
        .filter(|ct| !ct.is_empty() && *ct != OCTET_STREAM)
        .map(str::to_string)
        .or_else(|| mime_guess::from_path(name).first().map(|m| m.to_string()))
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// True for Word documents, which are flattened to text instead of sent as blobs.
pub fn is_docx(name: &str, content_type: Option<&str>) -> bool {
    content_type == Some(DOCX) || name.to_ascii_lowercase().ends_with(".docx")
}
