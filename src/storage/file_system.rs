use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::KeyValueStore;
use crate::error::StorageError;

/// Directory-backed store, one file per key
#[derive(Clone, Debug)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store with the default base directory ("./credits")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./credits"),
        }
    }

    /// Create a store with a custom base directory (for testing)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Path for a key; keys must be plain file names
    fn entry_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\', '\0']);
        if invalid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }

    /// List all stored keys
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.entry_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        fs::create_dir_all(&self.base_path)?;
        fs::write(&path, value)?;
        log::trace!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_and_listing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new_with_base_dir(dir.path().join("nested"));

        assert_eq!(store.get("credits_0x1").unwrap(), None);
        assert!(store.keys().unwrap().is_empty());

        store.set("credits_0x1", b"12").unwrap();
        store.set("transactions_0x1", b"[]").unwrap();

        assert_eq!(store.get("credits_0x1").unwrap(), Some(b"12".to_vec()));
        assert_eq!(
            store.keys().unwrap(),
            vec!["credits_0x1".to_string(), "transactions_0x1".to_string()]
        );

        store.remove("credits_0x1").unwrap();
        store.remove("credits_0x1").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["transactions_0x1".to_string()]);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new_with_base_dir(dir.path().to_path_buf());
        for key in ["", "..", "../escape", "a/b", "a\\b"] {
            assert!(matches!(store.set(key, b"x"), Err(StorageError::InvalidKey(_))));
        }
    }
}
