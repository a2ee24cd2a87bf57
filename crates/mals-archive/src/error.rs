use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("invalid archive magic at offset {offset}: expected {expected}, got {actual}")]
    InvalidMagic {
        offset: usize,
        expected: String,
        actual: String,
    },

    #[error("unsupported archive version: {0:#06x}")]
    UnsupportedVersion(u16),

    #[error("corrupt archive at offset {offset}: {reason}")]
    Corrupt { offset: usize, reason: String },

    #[error("cannot encode archive: {0}")]
    Encode(String),

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("compression failed: {0}")]
    CompressionFailed(String),
}

impl ArchiveError {
    /// Returns `true` for errors raised while reading archive bytes.
    pub fn is_decode(&self) -> bool {
        !matches!(self, Self::Encode(_) | Self::CompressionFailed(_))
    }
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
