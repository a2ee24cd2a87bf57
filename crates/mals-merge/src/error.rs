//! Error types for merge orchestration.

use std::path::PathBuf;

use mals_changelog::ChangelogError;

/// Errors that abort a merge run.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// An input root does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// No on-disk copy of a discovered source could be resolved.
    #[error("could not resolve {path} for '{key}'")]
    Resolution { key: String, path: PathBuf },

    /// A source could not be read, decoded, or diffed.
    #[error("failed to process {path} for '{key}': {source}")]
    Source {
        key: String,
        path: PathBuf,
        #[source]
        source: ChangelogError,
    },

    /// A merged archive or changelog export could not be produced.
    #[error("failed to build '{key}': {source}")]
    Build {
        key: String,
        #[source]
        source: ChangelogError,
    },

    /// Listing inputs or writing output failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type MergeResult<T> = Result<T, MergeError>;
