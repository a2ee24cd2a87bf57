//! Finding Mals sources inside mod folders.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use mals_locate::FileStore;
use mals_types::VersionedFile;
use tracing::{debug, warn};

use crate::error::{MergeError, MergeResult};

/// Folder holding message archives, relative to a romfs root.
pub const MALS_FOLDER: &str = "Mals";

pub(crate) const ARCHIVE_EXTENSION: &str = ".sarc.zs";
pub(crate) const CHANGELOG_EXTENSION: &str = ".json";

/// What a discovered file contributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// A compressed SARC archive to diff against vanilla.
    Archive,
    /// A previously exported JSON changelog.
    Changelog,
}

/// One input file and the output archive it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub key: String,
    pub kind: SourceKind,
    pub file: VersionedFile,
}

/// The Mals folder of a mod root: `root/romfs/Mals`, else `root/Mals`.
pub fn mals_dir(store: &dyn FileStore, root: &Path) -> Option<PathBuf> {
    [root.join("romfs"), root.to_path_buf()]
        .into_iter()
        .map(|base| base.join(MALS_FOLDER))
        .find(|dir| store.is_dir(dir))
}

/// The output key a file contributes to when no localization is forced.
pub fn source_key(file: &VersionedFile) -> String {
    if file.is_versioned() {
        return file.prefix().to_string();
    }
    let name = file.suffix();
    name.strip_suffix(ARCHIVE_EXTENSION)
        .or_else(|| name.strip_suffix(CHANGELOG_EXTENSION))
        .unwrap_or(name)
        .to_string()
}

fn source_kind(file: &VersionedFile) -> Option<SourceKind> {
    let name = file.name();
    if name.ends_with(ARCHIVE_EXTENSION) {
        Some(SourceKind::Archive)
    } else if name.ends_with(CHANGELOG_EXTENSION) {
        Some(SourceKind::Changelog)
    } else {
        None
    }
}

/// List the sources of one mod root in the order they are folded.
///
/// With `localization` set, every source is keyed `{localization}.Product`
/// and files of that locale come first.
pub fn discover(
    store: &dyn FileStore,
    root: &Path,
    localization: Option<&str>,
) -> MergeResult<Vec<Source>> {
    let Some(dir) = mals_dir(store, root) else {
        if !store.is_dir(root) {
            return Err(MergeError::MissingInput(root.to_path_buf()));
        }
        warn!(root = %root.display(), "no Mals folder, skipping");
        return Ok(Vec::new());
    };
    let base = dir.parent().unwrap_or(root).to_path_buf();

    let names = store.list_files(&dir).map_err(|source| io_error(&dir, source))?;

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for name in names {
        let file = VersionedFile::parse(&dir.join(&name), &base);
        let Some(kind) = source_kind(&file) else {
            warn!(file = %file, "not an archive or changelog, skipping");
            continue;
        };
        if !seen.insert((file.prefix().to_string(), file.suffix().to_string())) {
            debug!(file = %file, "another version already discovered");
            continue;
        }
        sources.push(Source {
            key: source_key(&file),
            kind,
            file,
        });
    }

    if let Some(locale) = localization {
        let forced = localized_key(locale);
        sources.sort_by_key(|source| source.key != forced);
        for source in &mut sources {
            source.key.clone_from(&forced);
        }
    }

    Ok(sources)
}

/// The merged archive key for a forced localization.
pub fn localized_key(locale: &str) -> String {
    format!("{locale}.Product")
}

fn io_error(path: &Path, source: io::Error) -> MergeError {
    MergeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use mals_locate::InMemoryFileStore;

    use super::*;

    fn store(paths: &[&str]) -> InMemoryFileStore {
        let store = InMemoryFileStore::new();
        for path in paths {
            store.insert(*path, b"data".to_vec());
        }
        store
    }

    #[test]
    fn prefers_romfs_folder() {
        let store = store(&["/mod/romfs/Mals/USen.Product.120.sarc.zs", "/mod/Mals/x.json"]);
        assert_eq!(
            mals_dir(&store, Path::new("/mod")),
            Some(PathBuf::from("/mod/romfs/Mals"))
        );
    }

    #[test]
    fn falls_back_to_bare_mals_folder() {
        let store = store(&["/mod/Mals/USen.Product.120.sarc.zs"]);
        let sources = discover(&store, Path::new("/mod"), None).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].file.root(), Path::new("/mod"));
        assert_eq!(sources[0].file.folder(), Path::new("Mals"));
    }

    #[test]
    fn keys_and_kinds() {
        let store = store(&[
            "/mod/romfs/Mals/Custom.sarc.zs",
            "/mod/romfs/Mals/EUen.Product.0.json",
            "/mod/romfs/Mals/USen.Product.120.sarc.zs",
            "/mod/romfs/Mals/readme.txt",
        ]);
        let sources = discover(&store, Path::new("/mod"), None).unwrap();
        let found: Vec<(&str, SourceKind)> =
            sources.iter().map(|s| (s.key.as_str(), s.kind)).collect();
        assert_eq!(
            found,
            vec![
                ("Custom", SourceKind::Archive),
                ("EUen.Product", SourceKind::Changelog),
                ("USen.Product", SourceKind::Archive),
            ]
        );
    }

    #[test]
    fn versions_of_one_file_collapse() {
        let store = store(&[
            "/mod/Mals/USen.Product.110.sarc.zs",
            "/mod/Mals/USen.Product.120.sarc.zs",
        ]);
        let sources = discover(&store, Path::new("/mod"), None).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].key, "USen.Product");
    }

    #[test]
    fn localization_forces_key_and_order() {
        let store = store(&[
            "/mod/Mals/EUen.Product.120.sarc.zs",
            "/mod/Mals/JPja.Product.120.sarc.zs",
            "/mod/Mals/USen.Product.120.sarc.zs",
        ]);
        let sources = discover(&store, Path::new("/mod"), Some("USen")).unwrap();
        assert!(sources.iter().all(|s| s.key == "USen.Product"));
        assert_eq!(sources[0].file.prefix(), "USen.Product");
        assert_eq!(sources[1].file.prefix(), "EUen.Product");
        assert_eq!(sources[2].file.prefix(), "JPja.Product");
    }

    #[test]
    fn root_without_mals_is_skipped() {
        let store = store(&["/mod/romfs/Pack/Actor.pack.zs"]);
        assert!(discover(&store, Path::new("/mod"), None).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = discover(&InMemoryFileStore::new(), Path::new("/nowhere"), None).unwrap_err();
        assert!(matches!(err, MergeError::MissingInput(_)));
    }
}
