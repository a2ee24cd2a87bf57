use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Compression level used when no level is configured.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 16;

/// Process-wide settings for a merge run, passed explicitly to every
/// resolution and build call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Root of the unmodified game dump (the folder containing `Mals`).
    pub game_path: PathBuf,
    /// The game version merged archives are built for.
    pub version: Option<u32>,
    /// zstd level for encoded archives.
    pub compression_level: i32,
    /// Optional raw zstd dictionary used for `*.zs` archives.
    pub zstd_dictionary: Option<PathBuf>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            game_path: PathBuf::from("."),
            version: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            zstd_dictionary: None,
        }
    }
}

impl MergeConfig {
    /// Read a TOML config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_game_path(mut self, game_path: impl Into<PathBuf>) -> Self {
        self.game_path = game_path.into();
        self
    }

    pub fn with_version(mut self, version: Option<u32>) -> Self {
        self.version = version;
        self
    }
}
