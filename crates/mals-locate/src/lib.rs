//! File resolution for the Mals merger.
//!
//! Finds the best available versioned copy of a game file, either inside a
//! mod folder or inside the unmodified game dump.
//!
//! # Key Types
//!
//! - [`FileStore`]: Read/list/write boundary (disk or in-memory)
//! - [`Locator`]: Best-match and vanilla resolution
//! - [`Resolved`]: The path and version that were actually found

pub mod disk;
pub mod error;
pub mod locator;
pub mod memory;
pub mod store;

pub use disk::DiskFileStore;
pub use error::{LocateError, LocateResult};
pub use locator::{Locator, Resolved};
pub use memory::InMemoryFileStore;
pub use store::FileStore;
