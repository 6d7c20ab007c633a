//! Bepawa Key-Value Storage
//!
//! The persistence model is a browser's local storage: string values
//! addressed by string keys, replaced whole on every write.
//!
//! - **memory**: in-process map, used by tests and ephemeral sessions
//! - **file**: JSON file holding the whole map, used by the CLI (feature `native`)
//! - **error**: Error types
//!
//! The web front end provides its own backend over `window.localStorage`.
//!
//! # Example
//!
//! ```rust
//! use bepawa::storage::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("greeting", "hello").unwrap();
//! assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
//! store.remove("greeting").unwrap();
//! assert!(store.get("greeting").unwrap().is_none());
//! ```

pub mod error;
#[cfg(feature = "native")]
pub mod file;
pub mod memory;

use std::rc::Rc;
use std::sync::Arc;

pub use error::{StorageError, StorageResult};
#[cfg(feature = "native")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// Default key holding the credential directory
pub const DIRECTORY_KEY: &str = "bepawa_users";

/// Default key holding the active session
pub const SESSION_KEY: &str = "bepawa_current_user";

/// A string key-value store with local-storage semantics.
///
/// Methods take `&self` so a single backend can be shared between the
/// credential directory and the session store.
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
