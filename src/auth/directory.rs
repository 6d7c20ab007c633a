//! Credential Directory
//!
//! The set of identity records that login and registration consult.
//!
//! `KvDirectory` keeps the whole collection as one JSON array under one
//! key. Every mutation reads the array, changes it in memory and writes it
//! back; concurrent writers lose updates (last write wins). Elements that
//! no longer deserialize are skipped on read and written back untouched.

use serde_json::Value;

use super::error::{AuthError, AuthResult};
use super::types::IdentityRecord;
use crate::storage::{KeyValueStore, StorageError, DIRECTORY_KEY};

/// Storage of identity records
pub trait CredentialDirectory {
    /// All records in insertion order
    fn records(&self) -> AuthResult<Vec<IdentityRecord>>;

    /// True when no record has been stored yet
    fn is_empty(&self) -> AuthResult<bool> {
        Ok(self.records()?.is_empty())
    }

    /// First record whose email matches case-insensitively
    fn find_by_email(&self, email: &str) -> AuthResult<Option<IdentityRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .find(|record| record.email_matches(email)))
    }

    /// Append a record. Fails with `DuplicateEmail` when the email is taken.
    fn insert(&self, record: IdentityRecord) -> AuthResult<()>;

    /// Replace the whole directory
    fn seed(&self, records: Vec<IdentityRecord>) -> AuthResult<()>;
}

impl<T: CredentialDirectory + ?Sized> CredentialDirectory for Box<T> {
    fn records(&self) -> AuthResult<Vec<IdentityRecord>> {
        (**self).records()
    }

    fn is_empty(&self) -> AuthResult<bool> {
        (**self).is_empty()
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<IdentityRecord>> {
        (**self).find_by_email(email)
    }

    fn insert(&self, record: IdentityRecord) -> AuthResult<()> {
        (**self).insert(record)
    }

    fn seed(&self, records: Vec<IdentityRecord>) -> AuthResult<()> {
        (**self).seed(records)
    }
}

/// Directory stored as a single JSON value in a key-value store
#[derive(Debug)]
pub struct KvDirectory<S> {
    store: S,
    key: String,
}

/// Raw contents of the directory key
enum Stored {
    Missing,
    Entries(Vec<Value>),
    /// Present but not a JSON array
    Malformed(String),
}

impl<S: KeyValueStore> KvDirectory<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DIRECTORY_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key holding the array
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key a malformed value is moved to before it gets overwritten
    pub fn backup_key(&self) -> String {
        format!("{}_corrupt", self.key)
    }

    fn load(&self) -> AuthResult<Stored> {
        let raw = match self.store.get(&self.key)? {
            Some(raw) => raw,
            None => return Ok(Stored::Missing),
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => Ok(Stored::Entries(entries)),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Credential directory is malformed");
                Ok(Stored::Malformed(raw))
            }
        }
    }

    /// Records that deserialize; the rest are skipped but stay stored
    fn parse_entries(&self, entries: &[Value]) -> Vec<IdentityRecord> {
        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                match serde_json::from_value::<IdentityRecord>(entry.clone()) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(key = %self.key, index, error = %e, "Skipping unreadable identity record");
                        None
                    }
                }
            })
            .collect()
    }

    fn write_entries(&self, entries: &[Value]) -> AuthResult<()> {
        let json = serde_json::to_string(entries).map_err(StorageError::from)?;
        self.store.set(&self.key, &json)?;
        Ok(())
    }
}

impl<S: KeyValueStore> CredentialDirectory for KvDirectory<S> {
    fn records(&self) -> AuthResult<Vec<IdentityRecord>> {
        match self.load()? {
            Stored::Missing | Stored::Malformed(_) => Ok(Vec::new()),
            Stored::Entries(entries) => Ok(self.parse_entries(&entries)),
        }
    }

    /// Empty only when nothing is stored or the array has no elements, so a
    /// damaged directory is never mistaken for a fresh one and reseeded
    fn is_empty(&self) -> AuthResult<bool> {
        Ok(match self.load()? {
            Stored::Missing => true,
            Stored::Entries(entries) => entries.is_empty(),
            Stored::Malformed(_) => false,
        })
    }

    fn insert(&self, record: IdentityRecord) -> AuthResult<()> {
        let mut entries = match self.load()? {
            Stored::Missing => Vec::new(),
            Stored::Entries(entries) => entries,
            Stored::Malformed(raw) => {
                let backup = self.backup_key();
                self.store.set(&backup, &raw)?;
                tracing::warn!(key = %self.key, backup = %backup, "Moved malformed credential directory aside");
                Vec::new()
            }
        };

        if self
            .parse_entries(&entries)
            .iter()
            .any(|r| r.email_matches(&record.email))
        {
            return Err(AuthError::DuplicateEmail);
        }

        entries.push(serde_json::to_value(&record).map_err(StorageError::from)?);
        self.write_entries(&entries)
    }

    fn seed(&self, records: Vec<IdentityRecord>) -> AuthResult<()> {
        let entries = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{Profile, Role};
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn record(id: &str, email: &str) -> IdentityRecord {
        IdentityRecord {
            id: id.to_string(),
            email: email.to_string(),
            name: String::new(),
            role: Role::Individual,
            password_hash: "$argon2id$x".to_string(),
            is_approved: true,
            created_at: Utc::now(),
            profile: Profile::default(),
        }
    }

    #[test]
    fn test_empty_directory() {
        let dir = KvDirectory::new(MemoryStore::new());
        assert!(dir.is_empty().unwrap());
        assert!(dir.records().unwrap().is_empty());
        assert!(dir.find_by_email("a@b.com").unwrap().is_none());
    }

    #[test]
    fn test_insert_and_find() {
        let dir = KvDirectory::new(MemoryStore::new());
        dir.insert(record("1", "Alice@Example.com")).unwrap();
        dir.insert(record("2", "bob@example.com")).unwrap();

        let found = dir.find_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(found.id, "1");
        assert_eq!(dir.records().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_email_leaves_directory_unchanged() {
        let store = MemoryStore::new();
        let dir = KvDirectory::new(&store);
        dir.insert(record("1", "alice@example.com")).unwrap();
        let before = store.get(DIRECTORY_KEY).unwrap();

        let err = dir.insert(record("2", "ALICE@example.com")).unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(store.get(DIRECTORY_KEY).unwrap(), before);
    }

    #[test]
    fn test_malformed_value_is_not_empty() {
        let store = MemoryStore::new();
        store.set(DIRECTORY_KEY, "{{ definitely not json").unwrap();

        let dir = KvDirectory::new(&store);
        assert!(dir.records().unwrap().is_empty());
        assert!(!dir.is_empty().unwrap());
    }

    #[test]
    fn test_insert_moves_malformed_value_aside() {
        let store = MemoryStore::new();
        store.set(DIRECTORY_KEY, "{{ definitely not json").unwrap();

        let dir = KvDirectory::new(&store);
        dir.insert(record("1", "a@b.com")).unwrap();

        assert_eq!(dir.records().unwrap().len(), 1);
        assert_eq!(
            store.get(&dir.backup_key()).unwrap().as_deref(),
            Some("{{ definitely not json")
        );
    }

    #[test]
    fn test_unreadable_element_is_skipped_and_kept() {
        let store = MemoryStore::new();
        let dir = KvDirectory::new(&store);
        dir.insert(record("1", "keep@x.com")).unwrap();

        let mut entries: Vec<Value> =
            serde_json::from_str(&store.get(DIRECTORY_KEY).unwrap().unwrap()).unwrap();
        let mut bad = entries[0].clone();
        bad["email"] = "doctor@x.com".into();
        bad["role"] = "doctor".into();
        entries.push(bad);
        store
            .set(DIRECTORY_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();

        let records = dir.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "keep@x.com");
        assert!(!dir.is_empty().unwrap());

        dir.insert(record("2", "new@x.com")).unwrap();
        let stored: Vec<Value> =
            serde_json::from_str(&store.get(DIRECTORY_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[1]["role"], "doctor");
    }

    #[test]
    fn test_seed_replaces_contents() {
        let dir = KvDirectory::new(MemoryStore::new());
        dir.insert(record("1", "old@example.com")).unwrap();
        dir.seed(vec![record("9", "new@example.com")]).unwrap();

        let records = dir.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "9");
    }

    #[test]
    fn test_custom_key() {
        let store = MemoryStore::new();
        let dir = KvDirectory::with_key(&store, "users_v2");
        dir.insert(record("1", "a@b.com")).unwrap();

        assert!(store.get("users_v2").unwrap().is_some());
        assert!(store.get(DIRECTORY_KEY).unwrap().is_none());
        assert_eq!(dir.key(), "users_v2");
    }
}
