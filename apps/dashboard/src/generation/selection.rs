use std::path::PathBuf;

use crate::documents::Upload;
use crate::generation::attachments::AttachmentSource;
use crate::profiles::models::StudentProfile;

/// A document the user may include in a request, labelled as in the UI.
#[derive(Debug, Clone)]
pub struct AvailableDocument {
    /// `[Saved] <file>` or `[New] <file>`.
    pub label: String,
    pub source: AttachmentSource,
}

/// Lists saved documents of the stored profile (if any) followed by this request's
/// uploads. A label seen twice keeps its first document.
pub fn available_documents(
    stored: Option<&StudentProfile>,
    uploads: &[Upload],
) -> Vec<AvailableDocument> {
    let saved = stored.into_iter().flat_map(|p| p.files.iter()).map(|path| {
        let source = AttachmentSource::Saved(PathBuf::from(path));
        AvailableDocument {
            label: format!("[Saved] {}", source.display_name()),
            source,
        }
    });
    let fresh = uploads.iter().map(|upload| AvailableDocument {
        label: format!("[New] {}", upload.file_name()),
        source: AttachmentSource::Uploaded(upload.clone()),
    });

    let mut documents: Vec<AvailableDocument> = Vec::new();
    for doc in saved.chain(fresh) {
        if !documents.iter().any(|d| d.label == doc.label) {
            documents.push(doc);
        }
    }
    documents
}

/// Keeps the documents whose labels were selected. `None` means everything, which
/// is the UI default (every checkbox starts ticked).
pub fn select(
    available: Vec<AvailableDocument>,
    selected: Option<&[String]>,
) -> Vec<AvailableDocument> {
    match selected {
        None => available,
        Some(labels) => available
            .into_iter()
            .filter(|d| labels.iter().any(|l| l == &d.label))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn profile(files: &[&str]) -> StudentProfile {
        StudentProfile {
            files: files.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    fn upload(name: &str) -> Upload {
        Upload {
            name: name.to_string(),
            content_type: None,
            data: Bytes::new(),
        }
    }

    #[test]
    fn test_labels_for_saved_and_new_documents() {
        let stored = profile(&["docs/Alex/transcript.pdf"]);
        let docs = available_documents(Some(&stored), &[upload("essay.docx")]);

        let labels: Vec<_> = docs.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["[Saved] transcript.pdf", "[New] essay.docx"]);
    }

    #[test]
    fn test_no_stored_profile_means_uploads_only() {
        let docs = available_documents(None, &[upload("a.pdf")]);
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_duplicate_labels_keep_first() {
        let stored = profile(&["docs/Alex/a.pdf", "old/a.pdf"]);
        let docs = available_documents(Some(&stored), &[]);
        assert_eq!(docs.len(), 1);
        assert!(matches!(
            &docs[0].source,
            AttachmentSource::Saved(p) if p == &PathBuf::from("docs/Alex/a.pdf")
        ));
    }

    #[test]
    fn test_select_defaults_to_everything() {
        let docs = available_documents(None, &[upload("a.pdf"), upload("b.pdf")]);
        assert_eq!(select(docs, None).len(), 2);
    }

    #[test]
    fn test_select_explicit_subset_and_empty() {
        let docs = available_documents(None, &[upload("a.pdf"), upload("b.pdf")]);
        let chosen = select(docs.clone(), Some(&["[New] b.pdf".to_string()]));
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].label, "[New] b.pdf");

        assert!(select(docs, Some(&[])).is_empty());
    }
}
