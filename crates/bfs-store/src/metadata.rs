use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bucket as reported by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    pub name: String,
    pub created: DateTime<Utc>,
}

impl BucketInfo {
    pub fn new(name: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created,
        }
    }
}

/// Metadata for one stored object.
///
/// This is everything the store exposes about an object; there are no owners,
/// permissions or extended attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub bucket: String,
    pub key: String,
    /// Content length in bytes.
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    /// Hex content hash.
    pub etag: String,
}

impl ObjectMetadata {
    /// Build metadata for `data` written at `last_modified`.
    pub fn for_content(
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: &[u8],
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size: data.len() as u64,
            last_modified,
            etag: content_etag(data),
        }
    }
}

/// Hex-encoded BLAKE3 hash used as an entity tag.
pub fn content_etag(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}

/// Result of a (possibly delimited) key listing.
///
/// With a delimiter, keys that continue past the delimiter after the prefix
/// are rolled up into `common_prefixes` (each ending in the delimiter).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectListing {
    pub objects: Vec<ObjectMetadata>,
    pub common_prefixes: Vec<String>,
}

impl ObjectListing {
    /// Returns `true` if neither objects nor prefixes were found.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.common_prefixes.is_empty()
    }
}
