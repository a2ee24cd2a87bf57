//! Merge orchestration for the Mals merger.
//!
//! Input mod folders are scanned for Mals archives and changelog exports,
//! each source is reduced to a changelog against the vanilla game, and the
//! changelogs are folded per output archive in priority order before being
//! rebuilt (or exported as JSON) under the output folder.

pub mod discovery;
pub mod error;
pub mod merger;

pub use discovery::{discover, Source, SourceKind, MALS_FOLDER};
pub use error::{MergeError, MergeResult};
pub use merger::Merger;
