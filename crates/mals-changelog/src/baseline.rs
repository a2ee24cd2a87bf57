//! Diffing against and rebuilding from the unmodified game archives.

use std::io::Write;
use std::sync::Arc;

use mals_archive::{ArchiveCodec, ArchiveMap};
use mals_locate::{Locator, Resolved};
use mals_types::{MergeConfig, VersionedFile};
use tracing::debug;

use crate::changelog::Changelog;
use crate::error::{ChangelogError, ChangelogResult};

/// Everything needed to find and decode vanilla archives.
#[derive(Clone)]
pub struct Baseline {
    config: MergeConfig,
    locator: Locator,
    codec: Arc<dyn ArchiveCodec>,
}

impl Baseline {
    pub fn new(config: MergeConfig, locator: Locator, codec: Arc<dyn ArchiveCodec>) -> Self {
        Self {
            config,
            locator,
            codec,
        }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn codec(&self) -> &dyn ArchiveCodec {
        self.codec.as_ref()
    }

    /// Resolve and decode the vanilla copy of `file` at `target`.
    ///
    /// Returns `Ok(None)` when the game dump has no copy of the file.
    pub fn load(
        &self,
        file: &VersionedFile,
        target: Option<u32>,
    ) -> ChangelogResult<Option<(Resolved, ArchiveMap)>> {
        let Some(resolved) = self.locator.resolve_vanilla(file, target, &self.config)? else {
            return Ok(None);
        };
        let store = self.locator.store();
        if !store.exists(&resolved.path) {
            return Ok(None);
        }

        let bytes = store.read(&resolved.path).map_err(|source| ChangelogError::Read {
            path: resolved.path.clone(),
            source,
        })?;
        let archive = self.codec.decode(&bytes)?;
        debug!(
            path = %resolved.path.display(),
            entries = archive.len(),
            "loaded vanilla archive"
        );
        Ok(Some((resolved, archive)))
    }
}

impl std::fmt::Debug for Baseline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Baseline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Changelog {
    /// Describe what the archive bytes `raw` of `source` change relative to
    /// the vanilla game.
    ///
    /// The vanilla copy is looked up at the source's own version, or at the
    /// configured version when the source name carries none.
    pub fn diff(source: &VersionedFile, raw: &[u8], baseline: &Baseline) -> ChangelogResult<Self> {
        let modded = baseline.codec().decode(raw)?;
        let target = source.version().or(baseline.config().version);
        let vanilla = baseline.load(source, target)?;

        if vanilla.is_none() {
            debug!(source = %source, "no vanilla copy, every entry is new");
        }
        let changelog = Self::diff_archives(vanilla.as_ref().map(|(_, archive)| archive), &modded);
        debug!(
            source = %source,
            upserts = changelog.upserts(),
            deletes = changelog.deletes(),
            "diffed against vanilla"
        );
        Ok(changelog)
    }

    /// Diff `raw` and fold the result in at lower priority.
    pub fn append_raw(
        &mut self,
        source: &VersionedFile,
        raw: &[u8],
        baseline: &Baseline,
    ) -> ChangelogResult<usize> {
        let changes = Self::diff(source, raw, baseline)?;
        Ok(self.append_changelog(changes))
    }

    /// Replay this changelog over the vanilla copy of `target` at the
    /// configured version and write the encoded archive to `out`.
    pub fn build<W: Write>(
        &self,
        target: &VersionedFile,
        baseline: &Baseline,
        mut out: W,
    ) -> ChangelogResult<()> {
        let vanilla = baseline.load(target, baseline.config().version)?;
        if vanilla.is_none() {
            debug!(target = %target, "building without a vanilla archive");
        }

        let archive = self.replay(vanilla.map(|(_, archive)| archive))?;
        let bytes = baseline.codec().encode(&archive)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }
}
