use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use tracing::{info, warn};

use crate::documents::DocumentStore;
use crate::profiles::models::{ProfileInput, Profiles, StudentProfile};
use crate::storage::{write_atomically, StoreError};

/// JSON file holding every student profile as one object keyed by name.
///
/// Each mutation loads the whole file, edits the map, and writes the whole file
/// back. The lock only serializes writers inside this process.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the store. A missing or unreadable file is treated as empty.
    pub fn load(&self) -> Profiles {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Profiles::new(),
            Err(e) => {
                warn!("Could not read {}: {e}", self.path.display());
                return Profiles::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed profile store {}: {e}", self.path.display());
            Profiles::new()
        })
    }

    /// Overwrites the store with `profiles`.
    pub fn save(&self, profiles: &Profiles) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(profiles)?;
        write_atomically(&self.path, &json)
    }

    pub fn names(&self) -> Vec<String> {
        self.load().into_keys().collect()
    }

    pub fn get(&self, name: &str) -> Option<StudentProfile> {
        self.load().remove(name)
    }

    /// Creates or replaces the profile for `input.name`.
    ///
    /// Previously saved file paths are kept and `new_files` appended; duplicates are
    /// dropped, keeping the first occurrence.
    pub fn upsert(
        &self,
        input: &ProfileInput,
        new_files: Vec<String>,
    ) -> Result<StudentProfile, StoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName(
                "student name is required".to_string(),
            ));
        }

        let _guard = self.lock();
        let mut profiles = self.load();

        let existing = profiles
            .get(name)
            .map(|p| p.files.clone())
            .unwrap_or_default();
        let files = merge_paths(existing, new_files);

        let profile = StudentProfile {
            grade: input.grade,
            target: input.target.clone(),
            major: input.major.clone(),
            status: input.status.clone(),
            files,
            last_updated: timestamp(),
        };
        profiles.insert(name.to_string(), profile.clone());
        self.save(&profiles)?;

        info!(
            "Saved profile '{}' with {} file(s)",
            name,
            profile.files.len()
        );
        Ok(profile)
    }

    /// Removes the profile and its document directory. Returns false when no such
    /// profile exists.
    pub fn delete(&self, name: &str, documents: &DocumentStore) -> Result<bool, StoreError> {
        let _guard = self.lock();
        let mut profiles = self.load();
        if profiles.remove(name).is_none() {
            return Ok(false);
        }
        self.save(&profiles)?;
        documents.remove_student_dir(name);
        info!("Deleted profile '{name}'");
        Ok(true)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn merge_paths(existing: Vec<String>, new_files: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + new_files.len());
    for path in existing.into_iter().chain(new_files) {
        if !merged.contains(&path) {
            merged.push(path);
        }
    }
    merged
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::models::Grade;

    fn input(name: &str) -> ProfileInput {
        ProfileInput {
            name: name.to_string(),
            grade: Grade::Eleventh,
            target: "Harvard, NYU".to_string(),
            major: "Computer Science".to_string(),
            status: "GPA 3.9, SAT 1520".to_string(),
        }
    }

    fn temp_store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("students_data.json"));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_upsert_persists_every_file_path() {
        let (_dir, store) = temp_store();
        let files = vec![
            "docs/Alex/a.pdf".to_string(),
            "docs/Alex/b.png".to_string(),
            "docs/Alex/c.docx".to_string(),
        ];

        store.upsert(&input("Alex"), files.clone()).unwrap();

        let reloaded = store.get("Alex").unwrap();
        assert_eq!(reloaded.files, files);
        assert_eq!(reloaded.grade, Grade::Eleventh);
        assert!(!reloaded.last_updated.is_empty());
    }

    #[test]
    fn test_upsert_merges_files_without_duplicates() {
        let (_dir, store) = temp_store();
        store
            .upsert(&input("Alex"), vec!["a.pdf".into(), "b.pdf".into()])
            .unwrap();
        let profile = store
            .upsert(&input("Alex"), vec!["b.pdf".into(), "c.pdf".into()])
            .unwrap();

        assert_eq!(profile.files, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_upsert_overwrites_fields() {
        let (_dir, store) = temp_store();
        store.upsert(&input("Alex"), vec![]).unwrap();

        let mut changed = input("Alex");
        changed.major = "Pre-Med".to_string();
        store.upsert(&changed, vec![]).unwrap();

        assert_eq!(store.get("Alex").unwrap().major, "Pre-Med");
        assert_eq!(store.names(), vec!["Alex"]);
    }

    #[test]
    fn test_upsert_rejects_blank_name() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.upsert(&input("   "), vec![]),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_store_keeps_non_ascii_text_readable() {
        let (_dir, store) = temp_store();
        let mut korean = input("김민준");
        korean.status = "내신 1.2".to_string();
        store.upsert(&korean, vec![]).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("김민준"));
        assert!(raw.contains("내신 1.2"));
    }

    #[test]
    fn test_delete_removes_profile_and_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("students.json"));
        let documents = DocumentStore::new(dir.path().join("docs"));
        std::fs::create_dir_all(documents.student_dir("Alex")).unwrap();

        store.upsert(&input("Alex"), vec![]).unwrap();
        store.upsert(&input("Bea"), vec![]).unwrap();

        assert!(store.delete("Alex", &documents).unwrap());
        assert_eq!(store.names(), vec!["Bea"]);
        assert!(!documents.student_dir("Alex").exists());

        assert!(!store.delete("Alex", &documents).unwrap());
    }
}
