//! The version-independent record of what one source changed in an archive.

use std::collections::btree_map::{self, BTreeMap};
use std::io::{Read, Write};

use mals_archive::ArchiveMap;
use serde::{Deserialize, Serialize};

use crate::entry::ChangelogEntry;
use crate::error::{ChangelogError, ChangelogResult};

/// Changes to one archive, keyed by entry name.
///
/// At most one change is held per name. When changelogs are combined with
/// [`append_changelog`](Self::append_changelog), the changelog already
/// holding a name keeps it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changelog {
    entries: BTreeMap<String, ChangelogEntry>,
}

impl Changelog {
    /// Create an empty changelog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&ChangelogEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Record a change, replacing any previous change for `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entry: ChangelogEntry,
    ) -> Option<ChangelogEntry> {
        self.entries.insert(name.into(), entry)
    }

    /// Number of upserted entries.
    pub fn upserts(&self) -> usize {
        self.entries.values().filter(|e| !e.is_delete()).count()
    }

    /// Number of deleted entries.
    pub fn deletes(&self) -> usize {
        self.entries.values().filter(|e| e.is_delete()).count()
    }

    /// Compute the changes that turn `baseline` into `modded`.
    ///
    /// Names whose content differs from (or is missing in) the baseline are
    /// upserts, baseline names missing from `modded` are deletes, and
    /// unchanged names are left out. Without a baseline every entry of
    /// `modded` is an upsert.
    pub fn diff_archives(baseline: Option<&ArchiveMap>, modded: &ArchiveMap) -> Self {
        let mut entries = BTreeMap::new();

        for (name, content) in modded {
            let unchanged = baseline
                .and_then(|b| b.get(name))
                .is_some_and(|original| original == content);
            if !unchanged {
                entries.insert(name.clone(), ChangelogEntry::Upsert(content.clone()));
            }
        }

        if let Some(baseline) = baseline {
            for name in baseline.keys() {
                if !modded.contains_key(name) {
                    entries.insert(name.clone(), ChangelogEntry::Delete);
                }
            }
        }

        Self { entries }
    }

    /// Fold a lower-priority changelog into this one.
    ///
    /// Only names not already present are taken from `other`. Returns the
    /// number of entries added.
    pub fn append_changelog(&mut self, other: Changelog) -> usize {
        let mut added = 0;
        for (name, entry) in other.entries {
            if let btree_map::Entry::Vacant(slot) = self.entries.entry(name) {
                slot.insert(entry);
                added += 1;
            }
        }
        added
    }

    /// Apply every change onto `baseline` and return the resulting entries.
    ///
    /// A delete cannot be reconstructed without a baseline, so replaying a
    /// changelog that holds any delete onto no baseline fails.
    pub fn replay(&self, baseline: Option<ArchiveMap>) -> ChangelogResult<ArchiveMap> {
        let mut archive = match baseline {
            Some(archive) => archive,
            None => {
                let deletes: Vec<&str> = self
                    .entries
                    .iter()
                    .filter(|(_, e)| e.is_delete())
                    .map(|(name, _)| name.as_str())
                    .collect();
                if !deletes.is_empty() {
                    return Err(ChangelogError::Build(format!(
                        "no baseline archive to delete {} from",
                        deletes.join(", ")
                    )));
                }
                ArchiveMap::new()
            }
        };

        for (name, entry) in self {
            match entry {
                ChangelogEntry::Upsert(content) => {
                    archive.insert(name.clone(), content.clone());
                }
                ChangelogEntry::Delete => {
                    archive.remove(name);
                }
            }
        }

        Ok(archive)
    }

    /// Serialize as a JSON object keyed by entry name.
    pub fn to_json(&self, pretty: bool) -> ChangelogResult<String> {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        result.map_err(ChangelogError::Serialize)
    }

    pub fn to_writer<W: Write>(&self, writer: W, pretty: bool) -> ChangelogResult<()> {
        let result = if pretty {
            serde_json::to_writer_pretty(writer, self)
        } else {
            serde_json::to_writer(writer, self)
        };
        result.map_err(ChangelogError::Serialize)
    }

    pub fn from_json(text: &str) -> ChangelogResult<Self> {
        serde_json::from_str(text).map_err(ChangelogError::Deserialize)
    }

    pub fn from_reader<R: Read>(reader: R) -> ChangelogResult<Self> {
        serde_json::from_reader(reader).map_err(ChangelogError::Deserialize)
    }
}

impl FromIterator<(String, ChangelogEntry)> for Changelog {
    fn from_iter<I: IntoIterator<Item = (String, ChangelogEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Changelog {
    type Item = (&'a String, &'a ChangelogEntry);
    type IntoIter = btree_map::Iter<'a, String, ChangelogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(pairs: &[(&str, &str)]) -> ArchiveMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect()
    }

    fn changelog(pairs: &[(&str, Option<&str>)]) -> Changelog {
        pairs
            .iter()
            .map(|(k, v)| {
                let entry = match v {
                    Some(content) => ChangelogEntry::upsert(*content),
                    None => ChangelogEntry::Delete,
                };
                (k.to_string(), entry)
            })
            .collect()
    }

    #[test]
    fn identical_archives_no_changes() {
        let base = archive(&[("A", "x"), ("B", "y")]);
        let diff = Changelog::diff_archives(Some(&base), &base);
        assert!(diff.is_empty());
    }

    #[test]
    fn missing_name_is_single_delete() {
        let base = archive(&[("A", "x"), ("B", "y")]);
        let modded = archive(&[("A", "x")]);

        let diff = Changelog::diff_archives(Some(&base), &modded);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("B"), Some(&ChangelogEntry::Delete));
    }

    #[test]
    fn modified_and_added_are_upserts() {
        let base = archive(&[("A", "x"), ("B", "y")]);
        let modded = archive(&[("A", "x2"), ("B", "y"), ("C", "z")]);

        let diff = Changelog::diff_archives(Some(&base), &modded);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff.get("A"), Some(&ChangelogEntry::upsert("x2")));
        assert_eq!(diff.get("C"), Some(&ChangelogEntry::upsert("z")));
        assert_eq!(diff.upserts(), 2);
        assert_eq!(diff.deletes(), 0);
    }

    #[test]
    fn no_baseline_everything_upserted() {
        let modded = archive(&[("A", "x"), ("B", "y")]);
        let diff = Changelog::diff_archives(None, &modded);
        assert_eq!(diff.upserts(), 2);
    }

    #[test]
    fn append_keeps_existing_entries() {
        let mut high = changelog(&[("E", Some("from S1"))]);
        let low = changelog(&[("E", Some("from S2"))]);

        let added = high.append_changelog(low);
        assert_eq!(added, 0);
        assert_eq!(high.get("E"), Some(&ChangelogEntry::upsert("from S1")));
    }

    #[test]
    fn append_accumulates_disjoint_entries() {
        let mut merged = changelog(&[("A", Some("a"))]);
        merged.append_changelog(changelog(&[("B", Some("b"))]));
        assert!(merged.contains("A"));
        assert!(merged.contains("B"));
    }

    #[test]
    fn append_is_idempotent_for_known_names() {
        let mut merged = changelog(&[("A", Some("a")), ("B", None)]);
        let before = merged.clone();

        merged.append_changelog(changelog(&[("A", None), ("B", Some("b"))]));
        merged.append_changelog(before.clone());
        assert_eq!(merged, before);
    }

    #[test]
    fn delete_from_higher_priority_wins_over_upsert() {
        let mut merged = changelog(&[("A", None)]);
        merged.append_changelog(changelog(&[("A", Some("revived"))]));
        assert_eq!(merged.get("A"), Some(&ChangelogEntry::Delete));
    }

    #[test]
    fn empty_changelog_replays_baseline() {
        let base = archive(&[("A", "x"), ("B", "y")]);
        let built = Changelog::new().replay(Some(base.clone())).unwrap();
        assert_eq!(built, base);
    }

    #[test]
    fn replay_applies_upserts_and_deletes() {
        let base = archive(&[("A", "x"), ("B", "y")]);
        let changes = changelog(&[("A", Some("x2")), ("B", None), ("C", Some("z")), ("Q", None)]);

        let built = changes.replay(Some(base)).unwrap();
        assert_eq!(built, archive(&[("A", "x2"), ("C", "z")]));
    }

    #[test]
    fn replay_without_baseline_rejects_deletes() {
        let changes = changelog(&[("A", Some("x")), ("B", None)]);
        let err = changes.replay(None).unwrap_err();
        assert!(matches!(err, ChangelogError::Build(_)));
    }

    #[test]
    fn replay_without_baseline_builds_upserts() {
        let changes = changelog(&[("A", Some("x"))]);
        assert_eq!(changes.replay(None).unwrap(), archive(&[("A", "x")]));
    }

    #[test]
    fn json_roundtrip_with_upserts_and_deletes() {
        let mut changes = changelog(&[("Msg/A.msbt", Some("text")), ("Msg/B.msbt", None)]);
        changes.insert("Msg/C.msbt", ChangelogEntry::upsert(vec![0x00, 0xff, 0xfe]));

        for pretty in [false, true] {
            let json = changes.to_json(pretty).unwrap();
            assert_eq!(Changelog::from_json(&json).unwrap(), changes);
        }
    }

    #[test]
    fn json_shape_is_object_keyed_by_name() {
        let changes = changelog(&[("A", Some("x2")), ("B", None)]);
        let value: serde_json::Value =
            serde_json::from_str(&changes.to_json(false).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"A": "x2", "B": {"deleted": true}}));
    }

    #[test]
    fn reserialization_is_stable() {
        let changes = changelog(&[("B", None), ("A", Some("x"))]);
        let first = changes.to_json(true).unwrap();
        let second = Changelog::from_json(&first).unwrap().to_json(true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_json_is_deserialize_error() {
        let err = Changelog::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ChangelogError::Deserialize(_)));
    }

    #[test]
    fn from_reader_parses_export() {
        let text = br#"{"A": "x", "B": {"deleted": true}}"#;
        let changes = Changelog::from_reader(&text[..]).unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes.deletes(), 1);
    }
}
