use crate::storage::{StorageError, Store};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

/// In-process store, mostly for tests. `unavailable()` builds one that
/// refuses every write, like a full or disabled disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, Value>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn unavailable() -> Self {
        Self {
            values: RefCell::default(),
            read_only: true,
        }
    }

    pub fn with_value(self, key: &str, value: Value) -> Self {
        self.values.borrow_mut().insert(key.to_owned(), value);
        self
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        self.values.borrow_mut().insert(key.to_owned(), value.clone());
        Ok(())
    }
}
