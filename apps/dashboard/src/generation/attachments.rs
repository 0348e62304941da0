//! Turns selected documents into prompt parts.
//!
//! Word files are flattened to text because the model API does not accept them as
//! blobs. Everything else is sent as an inline blob tagged with a content type.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::documents::{docx, mime, Upload};
use crate::generation::prompts::attached_document_header;
use crate::llm_client::Part;

/// Where a document comes from.
#[derive(Debug, Clone)]
pub enum AttachmentSource {
    /// A path previously recorded in the profile store.
    Saved(PathBuf),
    /// A file uploaded with the current request and not necessarily saved.
    Uploaded(Upload),
}

impl AttachmentSource {
    pub fn display_name(&self) -> String {
        match self {
            AttachmentSource::Saved(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            AttachmentSource::Uploaded(upload) => upload.file_name().to_string(),
        }
    }
}

/// Builds one part per usable document, in order. Saved paths that no longer exist
/// are skipped silently; read failures are logged and skipped.
pub fn build_parts(sources: &[AttachmentSource]) -> Vec<Part> {
    sources.iter().filter_map(part_for).collect()
}

fn part_for(source: &AttachmentSource) -> Option<Part> {
    match source {
        AttachmentSource::Uploaded(upload) => {
            let name = upload.file_name();
            if mime::is_docx(name, upload.content_type.as_deref()) {
                return docx_text_part(name, &upload.data);
            }
            Some(Part::Blob {
                mime_type: mime::upload_content_type(name, upload.content_type.as_deref()),
                data: upload.data.clone(),
            })
        }
        AttachmentSource::Saved(path) => saved_part(path, &source.display_name()),
    }
}

fn saved_part(path: &Path, name: &str) -> Option<Part> {
    if !path.exists() {
        return None;
    }
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("Error reading file {}: {e}", path.display());
            return None;
        }
    };

    if mime::is_docx(name, None) {
        return docx_text_part(name, &data);
    }
    Some(Part::Blob {
        mime_type: mime::content_type_for(path).to_string(),
        data: data.into(),
    })
}

fn docx_text_part(name: &str, data: &[u8]) -> Option<Part> {
    match docx::extract_text(data) {
        Ok(text) if !text.trim().is_empty() => Some(Part::Text(format!(
            "{}{}\n",
            attached_document_header(name),
            text
        ))),
        Ok(_) => None,
        Err(e) => {
            warn!("Error reading docx {name}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::io::Write;

    fn docx_bytes(paragraph: &str) -> Vec<u8> {
        let xml = format!(
            r#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>{paragraph}</w:t></w:r></w:p></w:body></w:document>"#
        );
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_uploaded_blob_keeps_declared_type() {
        let parts = build_parts(&[AttachmentSource::Uploaded(Upload {
            name: "scan.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            data: Bytes::from_static(b"\xff\xd8"),
        })]);

        assert_eq!(
            parts,
            vec![Part::Blob {
                mime_type: "image/jpeg".to_string(),
                data: Bytes::from_static(b"\xff\xd8"),
            }]
        );
    }

    #[test]
    fn test_uploaded_docx_becomes_text() {
        let parts = build_parts(&[AttachmentSource::Uploaded(Upload {
            name: "essay.docx".to_string(),
            content_type: None,
            data: Bytes::from(docx_bytes("Why I love chemistry")),
        })]);

        match &parts[..] {
            [Part::Text(text)] => {
                assert!(text.contains("[Attached Document Content: essay.docx]"));
                assert!(text.contains("Why I love chemistry"));
            }
            other => panic!("unexpected parts: {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_docx_is_skipped() {
        let parts = build_parts(&[AttachmentSource::Uploaded(Upload {
            name: "broken.docx".to_string(),
            content_type: None,
            data: Bytes::from_static(b"nope"),
        })]);
        assert!(parts.is_empty());
    }

    #[test]
    fn test_saved_file_uses_extension_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.xlsx");
        std::fs::write(&path, b"PK").unwrap();

        let parts = build_parts(&[AttachmentSource::Saved(path)]);
        match &parts[..] {
            [Part::Blob { mime_type, .. }] => assert_eq!(
                mime_type,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            other => panic!("unexpected parts: {other:?}"),
        }
    }

    #[test]
    fn test_missing_saved_file_is_skipped() {
        let parts = build_parts(&[
            AttachmentSource::Saved(PathBuf::from("/nonexistent/dangling.pdf")),
            AttachmentSource::Uploaded(Upload {
                name: "notes.txt".to_string(),
                content_type: None,
                data: Bytes::from_static(b"hi"),
            }),
        ]);
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_saved_docx_becomes_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, docx_bytes("Debate captain")).unwrap();

        let parts = build_parts(&[AttachmentSource::Saved(path)]);
        assert!(matches!(&parts[..], [Part::Text(t)] if t.contains("Debate captain")));
    }
}
