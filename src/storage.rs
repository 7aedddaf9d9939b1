//! Durable key-value string storage for collection snapshots.
//!
//! The store persists each collection as one JSON string under a fixed key.
//! Reads and writes are synchronous and local; there is no partial update,
//! every write replaces the whole snapshot for that key.

use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Storage key constants for consistent usage across the codebase.
pub mod keys {
    /// The persisted task collection.
    pub const TODOS: &str = "todos";
    /// The persisted category collection.
    pub const CATEGORIES: &str = "categories";
}

/// Trait for durable key-value string storage.
///
/// Implementations must be synchronous; the store calls `write` from within
/// every mutating operation. A missing key is not an error and reads as
/// `None`.
#[allow(clippy::missing_errors_doc)]
pub trait Storage {
    /// Read the string stored under `key`, or `None` if the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: Storage> Storage for Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// File-backed storage: one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at the given directory.
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a file storage rooted at the default data directory
    /// (`~/.taskdeck/`).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::NoDataDir`] if the home directory
    /// cannot be determined.
    pub fn in_data_dir() -> Result<Self> {
        crate::paths::data_dir().map(Self::new).ok_or(crate::error::Error::NoDataDir)
    }

    /// Get the directory snapshots are stored in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }
}

/// In-memory storage for tests.
///
/// Uses interior mutability so `write` can take `&self` like every other
/// backend. The core is single-threaded, so a `RefCell` suffices.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key with a value, bypassing the `Storage` trait.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_key_reads_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read(keys::TODOS).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.write(keys::TODOS, "[]").unwrap();
        assert_eq!(storage.read(keys::TODOS).unwrap().as_deref(), Some("[]"));

        // Overwrite replaces the whole snapshot
        storage.write(keys::TODOS, r#"[{"id":"x"}]"#).unwrap();
        assert_eq!(storage.read(keys::TODOS).unwrap().as_deref(), Some(r#"[{"id":"x"}]"#));
    }

    #[test]
    fn test_file_storage_creates_directory_on_write() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deck").join("data");
        let storage = FileStorage::new(&nested);

        storage.write(keys::CATEGORIES, "[]").unwrap();
        assert!(nested.join("categories.json").exists());
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.read("anything").unwrap().is_none());

        storage.write("anything", "value").unwrap();
        assert_eq!(storage.read("anything").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_rc_storage_delegates() {
        let storage = Rc::new(MemoryStorage::new());
        let handle = Rc::clone(&storage);

        handle.write(keys::TODOS, "[]").unwrap();
        assert_eq!(storage.read(keys::TODOS).unwrap().as_deref(), Some("[]"));
    }
}
