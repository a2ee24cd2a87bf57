//! Best-match resolution of versioned files.
//!
//! Resolution never mutates the requested [`VersionedFile`]; the version that
//! was actually found travels back in [`Resolved`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::Pattern;
use mals_types::{MergeConfig, VersionedFile};
use tracing::debug;

use crate::error::{LocateError, LocateResult};
use crate::store::FileStore;

/// A concrete file found for a versioned request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// Full path of the file.
    pub path: PathBuf,
    /// The version carried by the found file's name.
    pub version: Option<u32>,
}

impl Resolved {
    /// Apply the found version to the requested file.
    pub fn apply(&self, file: &VersionedFile) -> VersionedFile {
        file.with_version(self.version)
    }
}

/// Resolves versioned files against a [`FileStore`].
#[derive(Clone)]
pub struct Locator {
    store: Arc<dyn FileStore>,
}

impl Locator {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    /// Find the best on-disk copy of `file` under `search_root`.
    ///
    /// - With no target version, the rendered (unversioned) path is returned
    ///   as-is without checking that it exists.
    /// - If the file exists at exactly `target`, that path is returned
    ///   without listing the folder.
    /// - Otherwise every file in `search_root/folder` matching
    ///   `{prefix}*{suffix}` is considered and the highest version wins,
    ///   whether or not it is above `target`.
    pub fn resolve_best_match(
        &self,
        file: &VersionedFile,
        target: Option<u32>,
        search_root: &Path,
    ) -> LocateResult<Option<Resolved>> {
        let folder = search_root.join(file.folder());
        let exact = folder.join(file.name_at(target));

        let Some(target) = target else {
            return Ok(Some(Resolved {
                path: exact,
                version: None,
            }));
        };
        if self.store.exists(&exact) {
            return Ok(Some(Resolved {
                path: exact,
                version: Some(target),
            }));
        }

        let names = match self.store.list_files(&folder) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(folder = %folder.display(), "search folder missing");
                return Ok(None);
            }
            Err(source) => return Err(LocateError::Io { path: folder, source }),
        };

        let pattern = match_pattern(file)?;
        let best = names
            .iter()
            .filter(|name| pattern.matches(name))
            .map(|name| {
                let path = folder.join(name);
                let version = VersionedFile::parse(&path, &folder).version();
                Resolved { path, version }
            })
            .max_by_key(|candidate| candidate.version);

        match &best {
            Some(found) => debug!(
                file = %file,
                target_version = target,
                found = ?found.version,
                "resolved best match"
            ),
            None => debug!(file = %file, target_version = target, "no match found"),
        }
        Ok(best)
    }

    /// Find the unmodified game copy of `file`.
    pub fn resolve_vanilla(
        &self,
        file: &VersionedFile,
        target: Option<u32>,
        config: &MergeConfig,
    ) -> LocateResult<Option<Resolved>> {
        self.resolve_best_match(file, target, &config.game_path)
    }

    /// Highest version among the files in `dir` whose suffix is `suffix`.
    pub fn highest_version(&self, dir: &Path, suffix: &str) -> LocateResult<Option<u32>> {
        let names = match self.store.list_files(dir) {
            Ok(names) => names,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LocateError::Io {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        Ok(names
            .iter()
            .map(|name| VersionedFile::parse(&dir.join(name), dir))
            .filter(|file| file.suffix() == suffix)
            .filter_map(|file| file.version())
            .max())
    }
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator").finish_non_exhaustive()
    }
}

fn match_pattern(file: &VersionedFile) -> LocateResult<Pattern> {
    let pattern = format!(
        "{}*{}",
        Pattern::escape(file.prefix()),
        Pattern::escape(file.suffix())
    );
    Pattern::new(&pattern).map_err(|e| LocateError::Pattern {
        pattern: pattern.clone(),
        reason: e.to_string(),
    })
}
