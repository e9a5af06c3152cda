use crate::storage::{StorageError, Store};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

const FILE_PREFIX: &str = "mood_mirror_";

/// One pretty-printed JSON file per key inside a data directory.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{FILE_PREFIX}{key}.json")))
    }
}

impl Store for JsonFileStore {
    fn load(&self, key: &str) -> Option<Value> {
        let path = match self.path_for(key) {
            Ok(p) => p,
            Err(e) => {
                warn!(key, error = %e, "cannot load");
                return None;
            }
        };

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read stored data");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stored data is not valid json");
                None
            }
        }
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write beside the target then rename so a crash never leaves half a file.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(value)?)?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn saves_and_loads_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));

        assert_eq!(store.load("history"), None);
        store.save("history", &json!([{"mood": "Calm"}])).unwrap();
        assert_eq!(store.load("history"), Some(json!([{"mood": "Calm"}])));
        assert!(dir.path().join("nested/mood_mirror_history.json").exists());
    }

    #[test]
    fn overwrite_leaves_only_the_target_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save("settings", &json!({"reminders": false})).unwrap();
        store.save("settings", &json!({"reminders": true})).unwrap();

        assert_eq!(store.load("settings"), Some(json!({"reminders": true})));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["mood_mirror_settings.json"]);
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(dir.path().join("mood_mirror_history.json"), "{ not json").unwrap();
        assert_eq!(store.load("history"), None);
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.save("../escape", &json!(1)).unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert_eq!(store.load("../escape"), None);
    }
}
