use std::path::PathBuf;

/// Errors that can occur while resolving files.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    /// Listing a search folder failed for a reason other than it being absent.
    #[error("failed to list {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The match pattern built from a file name was rejected.
    #[error("invalid match pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },
}

/// Convenience alias for locate results.
pub type LocateResult<T> = Result<T, LocateError>;
