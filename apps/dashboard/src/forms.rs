//! Multipart form reader shared by the handlers that accept file uploads.

use std::collections::HashMap;

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use crate::documents::Upload;
use crate::errors::AppError;

/// Name of the multipart field carrying uploaded files.
pub const FILES_FIELD: &str = "files";

/// A fully buffered multipart form: text fields by name plus uploaded files.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    pub uploads: Vec<Upload>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILES_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file upload: {e}")))?;
                // Browsers submit an empty part for an untouched file input.
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.uploads.push(Upload {
                    name: file_name,
                    content_type,
                    data,
                });
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Invalid field '{name}': {e}")))?;
            form.fields.entry(name).or_default().push(text);
        }

        Ok(form)
    }

    /// First value of a text field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Parses a text field holding JSON.
    pub fn json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        self.text(key)
            .map(|raw| {
                serde_json::from_str(raw)
                    .map_err(|e| AppError::Validation(format!("Field '{key}' is not valid JSON: {e}")))
            })
            .transpose()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.fields
            .entry(key.to_string())
            .or_default()
            .push(value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        n: u32,
    }

    #[test]
    fn test_text_returns_first_value() {
        let mut form = FormData::default();
        form.insert("name", "Alex");
        form.insert("name", "Sam");

        assert_eq!(form.text("name"), Some("Alex"));
        assert!(form.text("missing").is_none());
    }

    #[test]
    fn test_json_field() {
        let mut form = FormData::default();
        form.insert("good", r#"{"n": 3}"#);
        form.insert("bad", "{");

        let parsed: Option<Sample> = form.json("good").unwrap();
        assert_eq!(parsed.unwrap().n, 3);
        assert!(form.json::<Sample>("bad").is_err());
        assert!(form.json::<Sample>("absent").unwrap().is_none());
    }
}
