use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::metadata::{BucketInfo, ObjectListing, ObjectMetadata};
use crate::names::validate_bucket_name;
use crate::traits::ObjectClient;

struct StoredObject {
    data: Vec<u8>,
    meta: ObjectMetadata,
}

struct Bucket {
    created: DateTime<Utc>,
    objects: BTreeMap<String, StoredObject>,
}

/// In-memory, BTreeMap-based object client.
///
/// Intended for tests and embedding. Buckets and objects are held behind a
/// `RwLock` for safe concurrent access; data is cloned on read and write.
pub struct InMemoryObjectClient {
    buckets: RwLock<BTreeMap<String, Bucket>>,
}

impl InMemoryObjectClient {
    /// Create a client with no buckets.
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a client pre-populated with empty buckets.
    pub fn with_buckets<I, S>(names: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let client = Self::new();
        for name in names {
            client.create_bucket(name.as_ref())?;
        }
        Ok(client)
    }

    /// Create an empty bucket.
    pub fn create_bucket(&self, name: &str) -> StoreResult<()> {
        validate_bucket_name(name)?;
        let mut buckets = self.buckets.write().expect("lock poisoned");
        if buckets.contains_key(name) {
            return Err(StoreError::BucketAlreadyExists(name.to_string()));
        }
        buckets.insert(
            name.to_string(),
            Bucket {
                created: Utc::now(),
                objects: BTreeMap::new(),
            },
        );
        debug!(bucket = name, "bucket created");
        Ok(())
    }

    /// Remove an empty bucket.
    pub fn delete_bucket(&self, name: &str) -> StoreResult<()> {
        let mut buckets = self.buckets.write().expect("lock poisoned");
        let bucket = buckets
            .get(name)
            .ok_or_else(|| StoreError::NoSuchBucket(name.to_string()))?;
        if !bucket.objects.is_empty() {
            return Err(StoreError::BucketNotEmpty(name.to_string()));
        }
        buckets.remove(name);
        debug!(bucket = name, "bucket deleted");
        Ok(())
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.read().expect("lock poisoned").len()
    }

    /// Total number of objects across all buckets.
    pub fn object_count(&self) -> usize {
        self.buckets
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.objects.len())
            .sum()
    }

    /// Remove every bucket and object.
    pub fn clear(&self) {
        self.buckets.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryObjectClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectClient for InMemoryObjectClient {
    fn list_buckets(&self) -> StoreResult<Vec<BucketInfo>> {
        let buckets = self.buckets.read().expect("lock poisoned");
        Ok(buckets
            .iter()
            .map(|(name, b)| BucketInfo::new(name.clone(), b.created))
            .collect())
    }

    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<char>,
    ) -> StoreResult<ObjectListing> {
        let buckets = self.buckets.read().expect("lock poisoned");
        let b = buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(bucket.to_string()))?;

        let mut listing = ObjectListing::default();
        let mut prefixes = BTreeSet::new();
        let matching = b
            .objects
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix));
        for (key, obj) in matching {
            let rest = &key[prefix.len()..];
            match delimiter.and_then(|d| rest.find(d).map(|i| i + d.len_utf8())) {
                Some(end) => {
                    prefixes.insert(format!("{prefix}{}", &rest[..end]));
                }
                None => listing.objects.push(obj.meta.clone()),
            }
        }
        listing.common_prefixes = prefixes.into_iter().collect();
        Ok(listing)
    }

    fn head_object(&self, bucket: &str, key: &str) -> StoreResult<Option<ObjectMetadata>> {
        let buckets = self.buckets.read().expect("lock poisoned");
        let b = buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(bucket.to_string()))?;
        Ok(b.objects.get(key).map(|o| o.meta.clone()))
    }

    fn get_object(&self, bucket: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let buckets = self.buckets.read().expect("lock poisoned");
        let b = buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(bucket.to_string()))?;
        Ok(b.objects.get(key).map(|o| o.data.clone()))
    }

    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> StoreResult<ObjectMetadata> {
        let mut buckets = self.buckets.write().expect("lock poisoned");
        let b = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(bucket.to_string()))?;
        let meta = ObjectMetadata::for_content(bucket, key, data, Utc::now());
        b.objects.insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                meta: meta.clone(),
            },
        );
        debug!(bucket, key, size = meta.size, "object stored");
        Ok(meta)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<bool> {
        let mut buckets = self.buckets.write().expect("lock poisoned");
        let b = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::NoSuchBucket(bucket.to_string()))?;
        Ok(b.objects.remove(key).is_some())
    }

    fn bucket_exists(&self, bucket: &str) -> StoreResult<bool> {
        Ok(self.buckets.read().expect("lock poisoned").contains_key(bucket))
    }
}

impl std::fmt::Debug for InMemoryObjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectClient")
            .field("bucket_count", &self.bucket_count())
            .field("object_count", &self.object_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(bucket: &str, keys: &[&str]) -> InMemoryObjectClient {
        let client = InMemoryObjectClient::with_buckets([bucket]).unwrap();
        for key in keys {
            client.put_object(bucket, key, key.as_bytes()).unwrap();
        }
        client
    }

    // -----------------------------------------------------------------------
    // Buckets
    // -----------------------------------------------------------------------

    #[test]
    fn list_buckets_is_sorted() {
        let client = InMemoryObjectClient::with_buckets(["bucketB", "bucketA"]).unwrap();
        let names: Vec<String> = client
            .list_buckets()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["bucketA", "bucketB"]);
    }

    #[test]
    fn duplicate_bucket_rejected() {
        let client = InMemoryObjectClient::with_buckets(["a1"]).unwrap();
        assert!(matches!(
            client.create_bucket("a1"),
            Err(StoreError::BucketAlreadyExists(_))
        ));
    }

    #[test]
    fn invalid_bucket_name_rejected() {
        let client = InMemoryObjectClient::new();
        assert!(matches!(
            client.create_bucket("no/slash"),
            Err(StoreError::InvalidBucketName { .. })
        ));
        assert_eq!(client.bucket_count(), 0);
    }

    #[test]
    fn delete_bucket_requires_empty() {
        let client = client_with("data", &["file"]);
        assert!(matches!(
            client.delete_bucket("data"),
            Err(StoreError::BucketNotEmpty(_))
        ));
        client.delete_object("data", "file").unwrap();
        client.delete_bucket("data").unwrap();
        assert!(!client.bucket_exists("data").unwrap());
    }

    #[test]
    fn missing_bucket_is_an_error() {
        let client = InMemoryObjectClient::new();
        assert!(matches!(
            client.get_object("nope", "k"),
            Err(StoreError::NoSuchBucket(_))
        ));
        assert!(matches!(
            client.list_objects("nope", "", None),
            Err(StoreError::NoSuchBucket(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    #[test]
    fn put_get_head_delete() {
        let client = InMemoryObjectClient::with_buckets(["data"]).unwrap();
        let meta = client.put_object("data", "dir/file", b"hello").unwrap();
        assert_eq!(meta.size, 5);

        assert_eq!(client.get_object("data", "dir/file").unwrap().unwrap(), b"hello");
        assert_eq!(client.head_object("data", "dir/file").unwrap().unwrap(), meta);

        assert!(client.delete_object("data", "dir/file").unwrap());
        assert!(!client.delete_object("data", "dir/file").unwrap());
        assert!(client.head_object("data", "dir/file").unwrap().is_none());
    }

    #[test]
    fn put_replaces_content() {
        let client = client_with("data", &["k"]);
        client.put_object("data", "k", b"new content").unwrap();
        assert_eq!(client.get_object("data", "k").unwrap().unwrap(), b"new content");
        assert_eq!(client.object_count(), 1);
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[test]
    fn flat_listing_returns_all_under_prefix() {
        let client = client_with("data", &["a/1", "a/2", "a/b/3", "ab", "c"]);
        let listing = client.list_objects("data", "a/", None).unwrap();
        let keys: Vec<&str> = listing.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/1", "a/2", "a/b/3"]);
        assert!(listing.common_prefixes.is_empty());
    }

    #[test]
    fn delimited_listing_rolls_up_prefixes() {
        let client = client_with("data", &["a/1", "a/b/2", "a/b/3", "a/c/4", "top"]);
        let listing = client.list_objects("data", "a/", Some('/')).unwrap();
        let keys: Vec<&str> = listing.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/1"]);
        assert_eq!(listing.common_prefixes, vec!["a/b/", "a/c/"]);

        let root = client.list_objects("data", "", Some('/')).unwrap();
        assert_eq!(root.common_prefixes, vec!["a/"]);
        assert_eq!(root.objects.len(), 1);
    }

    #[test]
    fn listing_missing_prefix_is_empty() {
        let client = client_with("data", &["a/1"]);
        assert!(client.list_objects("data", "zzz/", Some('/')).unwrap().is_empty());
    }

    #[test]
    fn debug_reports_counts() {
        let client = client_with("data", &["x", "y"]);
        let dbg = format!("{client:?}");
        assert!(dbg.contains("bucket_count: 1"));
        assert!(dbg.contains("object_count: 2"));
    }
}
