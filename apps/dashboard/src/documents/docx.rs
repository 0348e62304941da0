//! Plain-text extraction from Word (.docx) files.
//!
//! Only the main document part is read. Each `w:p` becomes one line; runs inside a
//! paragraph are concatenated.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a valid docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read document part: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Returns the paragraph texts of a .docx file joined with newlines.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    // Text boxes nest whole paragraphs inside a run of the outer one.
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match (e.name().as_ref(), open.last_mut()) {
                (b"w:p", _) => paragraphs.push(String::new()),
                (b"w:tab", Some(current)) => current.push('\t'),
                (b"w:br" | b"w:cr", Some(current)) => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(current) = open.last_mut() {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}
