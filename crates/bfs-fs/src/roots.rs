use bfs_store::ObjectClient;
use tracing::debug;

use crate::error::FsResult;

/// Enumerates the buckets of a connection; each bucket is a root directory.
///
/// Every call goes to the client, so the answer reflects the store at call
/// time. Client failures are returned as-is.
pub struct RootDirectoryEnumerator<'a> {
    client: &'a dyn ObjectClient,
}

impl<'a> RootDirectoryEnumerator<'a> {
    pub fn new(client: &'a dyn ObjectClient) -> Self {
        Self { client }
    }

    /// Bucket names in the order the client reports them.
    pub fn bucket_names(&self) -> FsResult<Vec<String>> {
        let names: Vec<String> = self
            .client
            .list_buckets()?
            .into_iter()
            .map(|b| b.name)
            .collect();
        debug!(count = names.len(), "enumerated root directories");
        Ok(names)
    }

    /// Whether `bucket` currently names a root.
    pub fn is_valid_root(&self, bucket: &str) -> FsResult<bool> {
        Ok(self.client.bucket_exists(bucket)?)
    }
}
