use crate::attributes::BASIC_VIEW;
use crate::key::FileSystemKey;

/// Name of the store reported when the connection sees no buckets.
pub const DEFAULT_STORE_NAME: &str = "default";

/// A storage pool backing part of a file system: one per bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileStore {
    name: String,
    owner: FileSystemKey,
}

impl FileStore {
    pub fn new(owner: FileSystemKey, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the file system this store belongs to.
    pub fn owner(&self) -> &FileSystemKey {
        &self.owner
    }

    pub fn store_type(&self) -> &'static str {
        "bucket"
    }

    pub fn is_read_only(&self) -> bool {
        false
    }

    pub fn supports_file_attribute_view(&self, view: &str) -> bool {
        view == BASIC_VIEW
    }
}
