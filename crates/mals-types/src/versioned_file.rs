//! Versioned file names: `prefix.version.suffix`.
//!
//! Game files carry the game version they belong to inside their name, for
//! example `USen.Product.120.sarc.zs`. A [`VersionedFile`] separates that
//! version from the logical identity of the file so the same file can be
//! looked up at any version.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// A literal dot, one or more decimal digits, a literal dot.
static VERSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([0-9]+)\.").expect("version token pattern is valid"));

/// A file identified independently of the concrete version on disk.
///
/// The rendered name is `prefix.version.suffix` when a version is present and
/// `suffix` alone otherwise. Neither `prefix` nor `suffix` contains a version
/// token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VersionedFile {
    prefix: String,
    version: Option<u32>,
    suffix: String,
    folder: PathBuf,
    root: PathBuf,
}

impl VersionedFile {
    /// Synthesize a file from its components (no root).
    pub fn new(
        prefix: impl Into<String>,
        version: Option<u32>,
        suffix: impl Into<String>,
        folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            version,
            suffix: suffix.into(),
            folder: folder.into(),
            root: PathBuf::new(),
        }
    }

    /// Parse an existing path relative to `root`.
    ///
    /// If the base name contains exactly one version token whose digits fit
    /// in a `u32`, it is split around that token. Otherwise the whole base
    /// name becomes the suffix and no version is recorded.
    pub fn parse(path: &Path, root: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder = relative_folder(path, root);

        let mut tokens = VERSION_TOKEN.find_iter(&name);
        if let (Some(token), None) = (tokens.next(), tokens.next()) {
            let digits = &name[token.start() + 1..token.end() - 1];
            if let Ok(version) = digits.parse::<u32>() {
                return Self {
                    prefix: name[..token.start()].to_string(),
                    version: Some(version),
                    suffix: name[token.end()..].to_string(),
                    folder,
                    root: root.to_path_buf(),
                };
            }
        }

        Self {
            prefix: String::new(),
            version: None,
            suffix: name,
            folder,
            root: root.to_path_buf(),
        }
    }

    /// The part of the name before the version token (may be empty).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The version found in the name, if any.
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// The part of the name after the version token, or the full name.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Containing folder relative to [`root`](Self::root).
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// The root folder this file is resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` if the name carried a version token.
    pub fn is_versioned(&self) -> bool {
        self.version.is_some()
    }

    /// The same file at another version.
    pub fn with_version(&self, version: Option<u32>) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    /// The rendered file name at the current version.
    pub fn name(&self) -> String {
        self.name_at(self.version)
    }

    /// The rendered file name at `version`.
    pub fn name_at(&self, version: Option<u32>) -> String {
        match version {
            Some(v) => format!("{}.{v}.{}", self.prefix, self.suffix),
            None => self.suffix.clone(),
        }
    }

    /// `root/folder/name`.
    pub fn path(&self) -> PathBuf {
        self.path_in(&self.root)
    }

    /// `root/folder/name` for an arbitrary root.
    pub fn path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.folder).join(self.name())
    }
}

impl fmt::Display for VersionedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder.join(self.name()).display())
    }
}

fn relative_folder(path: &Path, root: &Path) -> PathBuf {
    if root.as_os_str().is_empty() {
        return PathBuf::new();
    }
    path.parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
