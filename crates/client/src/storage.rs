//! File-backed storage so the cache survives between CLI invocations.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use eventboard_core::cache::{Result, Storage, StorageError};
use tempfile::NamedTempFile;

/// Default cache file name, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "eventboard-cache.json";

type Items = BTreeMap<String, String>;

/// [`Storage`] that keeps every item in one JSON object on disk.
///
/// Each call reads the file, and writes replace it atomically through a temp
/// file in the same directory. A missing or unreadable file is an empty store.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Items {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Items::new(),
            Err(err) => {
                tracing::warn!(path = ?self.path, error = %err, "Failed to read cache file, using an empty store");
                return Items::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(path = ?self.path, error = %err, "Failed to parse cache file, using an empty store");
                Items::new()
            }
        }
    }

    fn save(&self, items: &Items) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_error)?;

        let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
        let contents = serde_json::to_string(items)
            .map_err(|err| StorageError::Io(err.to_string()))?;
        temp.write_all(contents.as_bytes()).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        temp.persist(&self.path)
            .map_err(|err| io_error(err.error))?;

        tracing::trace!(path = ?self.path, items = items.len(), "Cache file written");
        Ok(())
    }
}

fn io_error(err: std::io::Error) -> StorageError {
    StorageError::Io(err.to_string())
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load().remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load();
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load();
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.save(&items)
    }
}
