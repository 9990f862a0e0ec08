use crate::error::StoreResult;
use crate::metadata::{BucketInfo, ObjectListing, ObjectMetadata};

/// Client for a bucket/key object store.
///
/// All implementations must satisfy these invariants:
/// - Keys are opaque strings; the client never escapes or splits them.
/// - Listings come back sorted by key.
/// - Calls may block on I/O. Retries and timeouts are the client's business;
///   failures it gives up on are returned, never swallowed.
pub trait ObjectClient: Send + Sync {
    /// List all buckets visible to the connection.
    fn list_buckets(&self) -> StoreResult<Vec<BucketInfo>>;

    /// List keys in `bucket` that start with `prefix`.
    ///
    /// With `Some(delimiter)`, keys containing the delimiter after the prefix
    /// are rolled up into [`ObjectListing::common_prefixes`].
    fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<char>,
    ) -> StoreResult<ObjectListing>;

    /// Fetch metadata for one object.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn head_object(&self, bucket: &str, key: &str) -> StoreResult<Option<ObjectMetadata>>;

    /// Read the bytes of one object.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    fn get_object(&self, bucket: &str, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Create or replace an object.
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> StoreResult<ObjectMetadata>;

    /// Delete an object. Returns `true` if the object existed.
    fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<bool>;

    /// Check whether a bucket exists.
    ///
    /// Default implementation scans [`list_buckets`](Self::list_buckets).
    fn bucket_exists(&self, bucket: &str) -> StoreResult<bool> {
        Ok(self.list_buckets()?.iter().any(|b| b.name == bucket))
    }
}
