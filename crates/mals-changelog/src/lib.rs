//! Changelog engine for the Mals merger.
//!
//! A changelog records, per archive entry name, whether a source added or
//! modified the entry (an upsert with full content) or removed it. Changelogs
//! from several sources are folded together in priority order and replayed
//! onto the vanilla archive to build the merged output.
//!
//! # Key Types
//!
//! - [`Changelog`]: named changes with diff, append, replay and JSON export
//! - [`ChangelogEntry`]: one upsert or delete
//! - [`Baseline`]: the configuration, locator and codec used to reach
//!   vanilla archives

pub mod baseline;
pub mod changelog;
pub mod entry;
pub mod error;

pub use baseline::Baseline;
pub use changelog::Changelog;
pub use entry::ChangelogEntry;
pub use error::{ChangelogError, ChangelogResult};
