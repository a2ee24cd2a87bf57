use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::store::FileStore;

/// In-memory, BTreeMap-based file store.
///
/// Intended for tests and embedding. Folders exist implicitly whenever a
/// file lives below them.
pub struct InMemoryFileStore {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
}

impl InMemoryFileStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert a file, builder style.
    pub fn with_file(self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    /// Insert or replace a file.
    pub fn insert(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.into(), data.into());
    }

    /// Number of files currently stored.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for InMemoryFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().expect("lock poisoned").contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .expect("lock poisoned")
            .keys()
            .any(|p| p != path && p.starts_with(path))
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<String>> {
        if !self.is_dir(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("folder not found: {}", dir.display()),
            ));
        }
        let map = self.files.read().expect("lock poisoned");
        Ok(map
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .read()
            .expect("lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {}", path.display()),
                )
            })
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        self.insert(path, data);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFileStore")
            .field("file_count", &self.len())
            .finish()
    }
}
