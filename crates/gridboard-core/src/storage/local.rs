//! Browser `localStorage` implementation for WebAssembly.

use super::{KeyValueStore, StorageError, StorageResult};
use web_sys::Storage;

/// Storage backed by `window.localStorage`.
///
/// Values are stored as UTF-8 strings. Not Send/Sync; the browser main
/// thread owns the handle.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the window's local storage.
    pub fn new() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.storage
            .get_item(key)
            .map(|value| value.map(String::into_bytes))
            .map_err(|e| StorageError::Other(format!("Failed to read {}: {:?}", key, e)))
    }

    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| StorageError::Serialization(format!("Value is not UTF-8: {}", e)))?;
        // setItem only throws on QuotaExceededError in practice
        self.storage
            .set_item(key, text)
            .map_err(|e| StorageError::QuotaExceeded(format!("{:?}", e)))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Other(format!("Failed to remove {}: {:?}", key, e)))
    }
}
