use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bfs_store::ObjectMetadata;

/// Name of the only attribute view bucketfs supports.
pub const BASIC_VIEW: &str = "basic";

/// What a path resolves to in the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// An object stored at exactly this key.
    File,
    /// A bucket root, a `key/` marker object, or a key prefix with children.
    Directory,
}

/// The basic attribute view: size, modification time and kind.
///
/// Objects carry no owners, permissions or link counts, so nothing else is
/// reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAttributes {
    pub kind: EntryKind,
    pub size: u64,
    /// `None` for directories that exist only as a key prefix.
    pub last_modified: Option<DateTime<Utc>>,
}

impl BasicAttributes {
    pub fn file(meta: &ObjectMetadata) -> Self {
        Self {
            kind: EntryKind::File,
            size: meta.size,
            last_modified: Some(meta.last_modified),
        }
    }

    pub fn directory(last_modified: Option<DateTime<Utc>>) -> Self {
        Self {
            kind: EntryKind::Directory,
            size: 0,
            last_modified,
        }
    }

    pub fn is_regular_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_symbolic_link(&self) -> bool {
        false
    }

    pub fn is_other(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_attributes_copy_metadata() {
        let meta = ObjectMetadata::for_content("b", "k", b"12345", Utc::now());
        let attrs = BasicAttributes::file(&meta);
        assert!(attrs.is_regular_file());
        assert!(!attrs.is_directory());
        assert_eq!(attrs.size, 5);
        assert_eq!(attrs.last_modified, Some(meta.last_modified));
    }

    #[test]
    fn directory_attributes() {
        let attrs = BasicAttributes::directory(None);
        assert!(attrs.is_directory());
        assert!(!attrs.is_symbolic_link());
        assert!(!attrs.is_other());
        assert_eq!(attrs.size, 0);
    }

    #[test]
    fn serde_roundtrip() {
        let attrs = BasicAttributes::directory(Some(Utc::now()));
        let json = serde_json::to_string(&attrs).unwrap();
        let parsed: BasicAttributes = serde_json::from_str(&json).unwrap();
        assert_eq!(attrs, parsed);
    }
}
