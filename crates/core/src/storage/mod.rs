mod file;
mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

pub const HISTORY_KEY: &str = "history";
pub const SETTINGS_KEY: &str = "settings";
pub const SESSION_KEY: &str = "last_session";

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Key/value persistence for JSON documents.
pub trait Store {
    /// `None` when the key was never saved or cannot be read.
    fn load(&self, key: &str) -> Option<Value>;

    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError>;
}

/// Reads and decodes `key`. Missing or malformed documents come back as `None`.
pub fn load_typed<T: DeserializeOwned>(store: &impl Store, key: &str) -> Option<T> {
    let value = store.load(key)?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed stored data");
            None
        }
    }
}

/// Encodes and writes `value`, logging instead of failing when storage is
/// unavailable. Returns whether the write went through.
pub fn save_typed<T: Serialize>(store: &impl Store, key: &str, value: &T) -> bool {
    let result = serde_json::to_value(value)
        .map_err(StorageError::from)
        .and_then(|v| store.save(key, &v));
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "failed to save data");
            false
        }
    }
}
