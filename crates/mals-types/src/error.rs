use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a [`MergeConfig`](crate::MergeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
