use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::storage::{write_atomically, StoreError};

const EMAIL_COLUMN: &str = "email";

/// Single-column CSV of subscriber addresses, header `email`.
///
/// Order is insertion order. Uniqueness is a linear membership check on add; the
/// file itself enforces nothing.
#[derive(Debug, Clone)]
pub struct SubscriberStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl SubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Trimmed, non-empty addresses in file order. A missing or unreadable file
    /// yields an empty list.
    pub fn load(&self) -> Vec<String> {
        if !self.path.exists() {
            return Vec::new();
        }
        match read_emails(&self.path) {
            Ok(emails) => emails,
            Err(e) => {
                warn!("Could not read subscribers from {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Appends addresses not already present. Returns how many were added; the file
    /// is only rewritten when that is non-zero.
    pub fn add<S: AsRef<str>>(&self, emails: &[S]) -> Result<usize, StoreError> {
        let _guard = self.lock();
        let mut current = self.load();
        let mut added = 0;

        for email in emails {
            let email = email.as_ref().trim();
            if !email.is_empty() && !current.iter().any(|e| e == email) {
                current.push(email.to_string());
                added += 1;
            }
        }

        if added > 0 {
            self.write(&current)?;
            info!("Added {added} subscriber(s); {} total", current.len());
        }
        Ok(added)
    }

    /// Removes the given addresses. Returns true when anything was removed.
    pub fn remove<S: AsRef<str>>(&self, emails: &[S]) -> Result<bool, StoreError> {
        let _guard = self.lock();
        let current = self.load();
        let targets: Vec<&str> = emails.iter().map(|e| e.as_ref().trim()).collect();

        let remaining: Vec<String> = current
            .iter()
            .filter(|e| !targets.contains(&e.as_str()))
            .cloned()
            .collect();

        if remaining.len() == current.len() {
            return Ok(false);
        }
        self.write(&remaining)?;
        info!(
            "Removed {} subscriber(s); {} remain",
            current.len() - remaining.len(),
            remaining.len()
        );
        Ok(true)
    }

    /// Removes every subscriber.
    pub fn clear(&self) -> Result<bool, StoreError> {
        let all = self.load();
        self.remove(all.as_slice())
    }

    fn write(&self, emails: &[String]) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([EMAIL_COLUMN])?;
        for email in emails {
            writer.write_record([email])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| {
                StoreError::io(
                    &self.path,
                    std::io::Error::new(e.error().kind(), e.error().to_string()),
                )
            })?;
        write_atomically(&self.path, &bytes)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn read_emails(path: &Path) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == EMAIL_COLUMN);
    let Some(column) = column else {
        warn!("{} has no '{EMAIL_COLUMN}' column", path.display());
        return Ok(Vec::new());
    };

    let mut emails = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(email) = record.get(column).map(str::trim).filter(|e| !e.is_empty()) {
            emails.push(email.to_string());
        }
    }
    Ok(emails)
}

/// Splits pasted text on commas and newlines and keeps entries containing `@`.
pub fn parse_email_input(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|e| e.contains('@'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SubscriberStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SubscriberStore::new(dir.path().join("newsletter_subscribers.csv"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_add_writes_email_column() {
        let (_dir, store) = temp_store();
        assert_eq!(store.add(&["a@x.com", " b@x.com "]).unwrap(), 2);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "email\na@x.com\nb@x.com\n");
        assert_eq!(store.load(), vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_duplicate_does_not_increase_count() {
        let (_dir, store) = temp_store();
        store.add(&["a@x.com"]).unwrap();

        assert_eq!(store.add(&["a@x.com", "  a@x.com"]).unwrap(), 0);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_duplicates_within_one_batch_are_added_once() {
        let (_dir, store) = temp_store();
        assert_eq!(store.add(&["a@x.com", "a@x.com"]).unwrap(), 1);
    }

    #[test]
    fn test_add_nothing_new_leaves_file_untouched() {
        let (_dir, store) = temp_store();
        assert_eq!(store.add(&["", "  "]).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_remove_selected() {
        let (_dir, store) = temp_store();
        store.add(&["a@x.com", "b@x.com", "c@x.com"]).unwrap();

        assert!(store.remove(&[" b@x.com"]).unwrap());
        assert_eq!(store.load(), vec!["a@x.com", "c@x.com"]);
        assert!(!store.remove(&["zzz@x.com"]).unwrap());
    }

    #[test]
    fn test_remove_all_empties_store() {
        let (_dir, store) = temp_store();
        store.add(&["a@x.com", "b@x.com"]).unwrap();

        assert!(store.clear().unwrap());
        assert!(store.load().is_empty());
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "email\n"
        );
    }

    #[test]
    fn test_load_skips_blank_cells_and_trims() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "email\n  a@x.com \n\"\"\nb@x.com\n").unwrap();
        assert_eq!(store.load(), vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_load_without_email_column_is_empty() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "address\na@x.com\n").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_parse_email_input() {
        let parsed = parse_email_input("a@x.com, b@x.com\nnot-an-email\n\n  c@x.com  ");
        assert_eq!(parsed, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }
}
