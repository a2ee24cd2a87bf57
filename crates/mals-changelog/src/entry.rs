//! A single named change inside an archive.

use serde::{Deserialize, Serialize};

/// The change recorded for one archive entry.
///
/// In JSON an upsert is the entry content as a string when it is valid
/// UTF-8, or `{"hex": "..."}` otherwise. A delete is `{"deleted": true}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRepr", into = "EntryRepr")]
pub enum ChangelogEntry {
    /// Full replacement content for the entry (added or modified).
    Upsert(Vec<u8>),
    /// The entry is removed.
    Delete,
}

impl ChangelogEntry {
    pub fn upsert(content: impl Into<Vec<u8>>) -> Self {
        Self::Upsert(content.into())
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete)
    }

    /// The upserted content, if any.
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            Self::Upsert(content) => Some(content),
            Self::Delete => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Text(String),
    Deleted { deleted: bool },
    Binary { hex: String },
}

impl From<ChangelogEntry> for EntryRepr {
    fn from(entry: ChangelogEntry) -> Self {
        match entry {
            ChangelogEntry::Delete => Self::Deleted { deleted: true },
            ChangelogEntry::Upsert(content) => match String::from_utf8(content) {
                Ok(text) => Self::Text(text),
                Err(e) => Self::Binary {
                    hex: hex::encode(e.into_bytes()),
                },
            },
        }
    }
}

impl TryFrom<EntryRepr> for ChangelogEntry {
    type Error = String;

    fn try_from(repr: EntryRepr) -> Result<Self, Self::Error> {
        match repr {
            EntryRepr::Text(text) => Ok(Self::Upsert(text.into_bytes())),
            EntryRepr::Deleted { deleted: true } => Ok(Self::Delete),
            EntryRepr::Deleted { deleted: false } => {
                Err("tombstone must be {\"deleted\": true}".into())
            }
            EntryRepr::Binary { hex } => hex::decode(&hex)
                .map(Self::Upsert)
                .map_err(|e| format!("invalid hex content: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_upsert_is_plain_string() {
        let value = serde_json::to_value(ChangelogEntry::upsert("Hello, Link")).unwrap();
        assert_eq!(value, json!("Hello, Link"));
    }

    #[test]
    fn binary_upsert_is_hex() {
        let value = serde_json::to_value(ChangelogEntry::upsert(vec![0xff, 0x00, 0x10])).unwrap();
        assert_eq!(value, json!({"hex": "ff0010"}));
    }

    #[test]
    fn delete_is_tombstone() {
        let value = serde_json::to_value(ChangelogEntry::Delete).unwrap();
        assert_eq!(value, json!({"deleted": true}));
    }

    #[test]
    fn parse_each_form() {
        let text: ChangelogEntry = serde_json::from_value(json!("x2")).unwrap();
        assert_eq!(text, ChangelogEntry::upsert("x2"));

        let binary: ChangelogEntry = serde_json::from_value(json!({"hex": "0102"})).unwrap();
        assert_eq!(binary, ChangelogEntry::upsert(vec![1, 2]));

        let delete: ChangelogEntry = serde_json::from_value(json!({"deleted": true})).unwrap();
        assert!(delete.is_delete());
        assert_eq!(delete.content(), None);
    }

    #[test]
    fn false_tombstone_rejected() {
        let result: Result<ChangelogEntry, _> = serde_json::from_value(json!({"deleted": false}));
        assert!(result.is_err());
    }

    #[test]
    fn bad_hex_rejected() {
        let result: Result<ChangelogEntry, _> = serde_json::from_value(json!({"hex": "zz"}));
        assert!(result.is_err());
    }

    #[test]
    fn numbers_rejected() {
        let result: Result<ChangelogEntry, _> = serde_json::from_value(json!(42));
        assert!(result.is_err());
    }
}
