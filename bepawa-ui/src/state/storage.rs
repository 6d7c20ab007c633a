//! Browser Storage
//!
//! `KeyValueStore` over `window.localStorage`, so the core session store
//! persists across page reloads exactly as it does on disk natively.

use bepawa::storage::{KeyValueStore, StorageError, StorageResult};
use wasm_bindgen::JsValue;

/// `localStorage` handle. Absent when the browser blocks storage.
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    /// Open the window's local storage
    pub fn local() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());

        if storage.is_none() {
            web_sys::console::warn_1(&"localStorage unavailable; accounts will not persist".into());
        }

        Self { storage }
    }

    fn storage(&self) -> StorageResult<&web_sys::Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".to_string()))
    }
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::Unavailable(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        // Quota errors surface here
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}
