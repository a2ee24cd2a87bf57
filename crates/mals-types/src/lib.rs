//! Foundation types for the Mals merger.
//!
//! # Key Types
//!
//! - [`VersionedFile`]: A game file name split into `prefix.version.suffix`
//! - [`MergeConfig`]: Game dump location, target version, and codec settings

pub mod config;
pub mod error;
pub mod versioned_file;

pub use config::{MergeConfig, DEFAULT_COMPRESSION_LEVEL};
pub use error::{ConfigError, ConfigResult};
pub use versioned_file::VersionedFile;
