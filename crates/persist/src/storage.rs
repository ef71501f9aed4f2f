//! Key/value storage backends.
//!
//! Layout inside a directory-backed store:
//! ```text
//! <root>/
//!   mansionLayout     - one file per key, holding the value verbatim
//! ```

use mansion_kernel::LayoutError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors from storage and layout persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved layout is inconsistent: {0}")]
    Layout(#[from] LayoutError),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// String key/value storage with the shape of the browser's local storage.
pub trait Storage {
    /// Read a value. `Ok(None)` when the key was never set.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Create or overwrite a value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value. Deleting an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory storage. Lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Directory-backed storage: each key is a file under the root.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Open or create a store rooted at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "storage opened");
        Ok(Self { root })
    }

    /// Get the path to the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl Storage for DirStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_set_get_remove() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v1").unwrap();
        store.set_item("k", "v2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn dir_open_creates_root() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirStorage::open(tmp.path().join("a").join("b")).unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn dir_values_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scene");
        {
            let mut store = DirStorage::open(&path).unwrap();
            store.set_item("mansionLayout", "[]").unwrap();
        }
        let store = DirStorage::open(&path).unwrap();
        assert_eq!(store.get_item("mansionLayout").unwrap().as_deref(), Some("[]"));
        assert!(path.join("mansionLayout").is_file());
    }

    #[test]
    fn dir_missing_key_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirStorage::open(tmp.path()).unwrap();
        assert_eq!(store.get_item("nothing").unwrap(), None);
        store.remove_item("nothing").unwrap();
    }

    #[test]
    fn dir_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirStorage::open(tmp.path()).unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                store.set_item(key, "x"),
                Err(StoreError::InvalidKey(_))
            ));
        }
    }
}
