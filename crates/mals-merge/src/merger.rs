use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mals_changelog::{Baseline, Changelog, ChangelogError};
use mals_types::VersionedFile;
use tracing::{debug, info};

use crate::discovery::{discover, Source, SourceKind, ARCHIVE_EXTENSION, MALS_FOLDER};
use crate::error::{MergeError, MergeResult};

/// Folds the Mals sources of several mods into one changelog per archive.
///
/// All inputs are read and diffed when the merger is created, so a bad
/// input fails before anything is written.
pub struct Merger {
    output: PathBuf,
    baseline: Baseline,
    changelogs: BTreeMap<String, Changelog>,
}

impl Merger {
    /// Discover and fold every source under `inputs`.
    ///
    /// `inputs` are ordered from highest to lowest priority: for each
    /// entry name the first source that changes it wins.
    pub fn new(
        inputs: &[PathBuf],
        output: impl Into<PathBuf>,
        localization: Option<&str>,
        baseline: Baseline,
    ) -> MergeResult<Self> {
        let mut changelogs: BTreeMap<String, Changelog> = BTreeMap::new();
        let store = baseline.locator().store().clone();

        for root in inputs {
            for source in discover(store.as_ref(), root, localization)? {
                let changelog = changelogs.entry(source.key.clone()).or_default();
                let added = match source.kind {
                    SourceKind::Changelog => fold_export(changelog, &source, &baseline)?,
                    SourceKind::Archive => fold_archive(changelog, &source, &baseline)?,
                };
                debug!(key = %source.key, added, "folded source");
            }
        }

        Ok(Self {
            output: output.into(),
            baseline,
            changelogs,
        })
    }

    /// Merged changelogs keyed by output archive.
    pub fn changelogs(&self) -> &BTreeMap<String, Changelog> {
        &self.changelogs
    }

    /// Build and write one archive per key with changes.
    ///
    /// Returns the written paths. Every archive is built before the first
    /// one is written.
    pub fn merge(&self) -> MergeResult<Vec<PathBuf>> {
        let version = self.baseline.config().version;
        let mut outputs = Vec::new();

        for (key, changelog) in &self.changelogs {
            if changelog.is_empty() {
                debug!(key = %key, "no changes, nothing to build");
                continue;
            }
            let target = archive_target(key, version);
            let mut bytes = Vec::new();
            changelog
                .build(&target, &self.baseline, &mut bytes)
                .map_err(|source| MergeError::Build {
                    key: key.clone(),
                    source,
                })?;
            outputs.push((target.path_in(&self.output), bytes));
        }

        self.write_all(outputs)
    }

    /// Write every merged changelog as `Mals/<key>.0.json`.
    pub fn generate_changelogs(&self, pretty: bool) -> MergeResult<Vec<PathBuf>> {
        let mut outputs = Vec::new();

        for (key, changelog) in &self.changelogs {
            let target = VersionedFile::new(key.as_str(), Some(0), "json", MALS_FOLDER);
            let mut json = Vec::new();
            changelog
                .to_writer(&mut json, pretty)
                .map_err(|source| MergeError::Build {
                    key: key.clone(),
                    source,
                })?;
            outputs.push((target.path_in(&self.output), json));
        }

        self.write_all(outputs)
    }

    fn write_all(&self, outputs: Vec<(PathBuf, Vec<u8>)>) -> MergeResult<Vec<PathBuf>> {
        let store = self.baseline.locator().store();
        let mut written = Vec::with_capacity(outputs.len());
        for (path, bytes) in outputs {
            store.write(&path, &bytes).map_err(|source| MergeError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), bytes = bytes.len(), "wrote output");
            written.push(path);
        }
        Ok(written)
    }
}

impl std::fmt::Debug for Merger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Merger")
            .field("output", &self.output)
            .field("keys", &self.changelogs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// The archive a key is built into at `version`.
pub fn archive_target(key: &str, version: Option<u32>) -> VersionedFile {
    match version {
        Some(_) => VersionedFile::new(key, version, "sarc.zs", MALS_FOLDER),
        None => {
            let name = format!("{key}{ARCHIVE_EXTENSION}");
            VersionedFile::new("", None, name, MALS_FOLDER)
        }
    }
}

fn fold_export(
    changelog: &mut Changelog,
    source: &Source,
    baseline: &Baseline,
) -> MergeResult<usize> {
    let path = source.file.path();
    info!(key = %source.key, file = %source.file, "found changelog");

    let bytes = baseline.locator().store().read(&path).map_err(|e| {
        let error = ChangelogError::Read {
            path: path.clone(),
            source: e,
        };
        source_error(source, &path, error)
    })?;
    let export =
        Changelog::from_reader(bytes.as_slice()).map_err(|e| source_error(source, &path, e))?;
    Ok(changelog.append_changelog(export))
}

fn fold_archive(
    changelog: &mut Changelog,
    source: &Source,
    baseline: &Baseline,
) -> MergeResult<usize> {
    info!(key = %source.key, file = %source.file, "found archive");

    let file = &source.file;
    let target = baseline.config().version.or(file.version());
    let resolved = baseline
        .locator()
        .resolve_best_match(file, target, file.root())
        .map_err(|e| source_error(source, &file.path(), e.into()))?;
    let Some(resolved) = resolved.filter(|r| baseline.locator().store().exists(&r.path)) else {
        return Err(MergeError::Resolution {
            key: source.key.clone(),
            path: file.path(),
        });
    };

    let raw = baseline
        .locator()
        .store()
        .read(&resolved.path)
        .map_err(|e| {
            source_error(
                source,
                &resolved.path,
                ChangelogError::Read {
                    path: resolved.path.clone(),
                    source: e,
                },
            )
        })?;
    changelog
        .append_raw(&resolved.apply(file), &raw, baseline)
        .map_err(|e| source_error(source, &resolved.path, e))
}

fn source_error(source: &Source, path: &Path, error: ChangelogError) -> MergeError {
    MergeError::Source {
        key: source.key.clone(),
        path: path.to_path_buf(),
        source: error,
    }
}
