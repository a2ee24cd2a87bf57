use std::io;
use std::path::Path;

/// Read/write access to the files a merge run touches.
///
/// Implementations must satisfy:
/// - `list_files` returns bare file names (no directories), sorted by name,
///   and fails with [`io::ErrorKind::NotFound`] when the folder is absent.
/// - `write` creates missing parent folders.
/// - All I/O errors are propagated, never silently ignored.
pub trait FileStore: Send + Sync {
    /// Returns `true` if a regular file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a folder.
    fn is_dir(&self, path: &Path) -> bool;

    /// File names directly inside `dir`.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or replace a whole file.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;
}
