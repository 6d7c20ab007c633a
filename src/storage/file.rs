//! File Store - local storage persisted as one JSON file
//!
//! Keeps the whole key space in memory and rewrites the file on every
//! mutation, the same whole-value replacement a browser performs. Writes go
//! to a sibling temp file that is renamed over the original, so a crash
//! mid-write leaves the previous contents intact.
//!
//! A file that cannot be parsed is moved to `local_storage.json.corrupt`
//! and the store starts empty, like a browser whose storage was cleared.
//!
//! # Layout
//! ```text
//! <data_dir>/local_storage.json
//! { "version": 1, "entries": { "bepawa_users": "[...]", ... } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{KeyValueStore, StorageError, StorageResult};

/// File name used inside the data directory
pub const STORAGE_FILE: &str = "local_storage.json";

/// Serialization format for JSON persistence
#[derive(Serialize, Deserialize)]
struct StorageFileData {
    /// Version for future compatibility
    version: u32,
    entries: HashMap<String, String>,
}

/// Key-value store backed by a single JSON file
#[derive(Debug)]
pub struct FileStore {
    entries: RwLock<HashMap<String, String>>,
    path: PathBuf,
}

impl FileStore {
    /// Create or load the store inside `data_dir`
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        Self::open_file(data_dir.join(STORAGE_FILE))
    }

    /// Create or load the store at an explicit file path
    pub fn open_file(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            match Self::load_from_file(&path) {
                Ok(entries) => entries,
                Err(StorageError::Serialization(e)) => {
                    Self::set_aside(&path);
                    tracing::warn!(path = ?path, error = %e, "Local storage file is corrupt, starting empty");
                    HashMap::new()
                }
                Err(e) => return Err(e),
            }
        } else {
            HashMap::new()
        };

        tracing::debug!(path = ?path, keys = entries.len(), "Opened file store");

        Ok(Self {
            entries: RwLock::new(entries),
            path,
        })
    }

    fn load_from_file(path: &Path) -> StorageResult<HashMap<String, String>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let data: StorageFileData = serde_json::from_reader(reader).map_err(|e| {
            StorageError::Serialization(format!("Failed to load {}: {}", path.display(), e))
        })?;

        Ok(data.entries)
    }

    /// Where a corrupt file is moved
    pub fn corrupt_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn set_aside(path: &Path) {
        let target = Self::corrupt_path(path);
        if let Err(e) = std::fs::rename(path, &target) {
            tracing::warn!(path = ?path, error = %e, "Could not move corrupt local storage file aside");
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let data = StorageFileData {
            version: 1,
            entries: entries.clone(),
        };

        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &data).map_err(|e| {
                StorageError::Serialization(format!("Failed to persist local storage: {}", e))
            })?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;

        Ok(())
    }

    /// Get the persistence file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_creation() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.get("anything").unwrap().is_none());
        // Nothing is written until the first mutation
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("bepawa_users", "[]").unwrap();
            store.set("bepawa_current_user", "{\"id\":\"1\"}").unwrap();
        }

        {
            let store = FileStore::open(dir.path()).unwrap();
            assert_eq!(store.get("bepawa_users").unwrap().as_deref(), Some("[]"));
            assert_eq!(
                store.get("bepawa_current_user").unwrap().as_deref(),
                Some("{\"id\":\"1\"}")
            );
        }
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempdir().unwrap();

        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("k", "v").unwrap();
            store.remove("k").unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.get("bepawa_users").unwrap().is_none());

        let backup = FileStore::corrupt_path(&path);
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "{ not json");

        store.set("k", "v").unwrap();
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_persist_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(STORAGE_FILE)]);
    }
}
