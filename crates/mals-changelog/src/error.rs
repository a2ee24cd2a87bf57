//! Error types for the changelog crate.

use std::path::PathBuf;

/// Errors that can occur while diffing, merging, or rebuilding archives.
#[derive(Debug, thiserror::Error)]
pub enum ChangelogError {
    /// Resolving a file against a root failed.
    #[error("resolution failed: {0}")]
    Locate(#[from] mals_locate::LocateError),

    /// Archive bytes could not be decoded or encoded.
    #[error("archive error: {0}")]
    Archive(#[from] mals_archive::ArchiveError),

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing rebuilt output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A changelog export is not valid JSON of the expected shape.
    #[error("invalid changelog: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// A changelog could not be written as JSON.
    #[error("failed to serialize changelog: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The changelog cannot be replayed onto the available baseline.
    #[error("cannot rebuild archive: {0}")]
    Build(String),
}

/// Convenience alias for changelog results.
pub type ChangelogResult<T> = Result<T, ChangelogError>;
