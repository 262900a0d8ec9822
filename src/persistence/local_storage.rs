//! Browser LocalStorage backend

use wasm_bindgen::JsValue;
use web_sys::Storage;

use super::{StateStore, StoreError};

/// `window.localStorage` wrapper
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Grab the window's LocalStorage (fails in private modes that block it)
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn backend_error(err: JsValue) -> StoreError {
    StoreError::Backend(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl StateStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(backend_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(backend_error)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(backend_error)
    }
}
