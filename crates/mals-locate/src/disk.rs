use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::store::FileStore;

/// [`FileStore`] backed by the local file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskFileStore;

impl DiskFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for DiskFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<String>> {
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("folder not found: {}", dir.display()),
            ));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("Mals").join("a.bin");

        let store = DiskFileStore::new();
        store.write(&path, b"payload").unwrap();

        assert!(store.exists(&path));
        assert!(store.is_dir(&dir.path().join("out")));
        assert_eq!(store.read(&path).unwrap(), b"payload");
    }

    #[test]
    fn list_files_sorted_and_skips_folders() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.txt"), b"").unwrap();

        let names = DiskFileStore::new().list_files(dir.path()).unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn list_missing_folder_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiskFileStore::new()
            .list_files(&dir.path().join("missing"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
