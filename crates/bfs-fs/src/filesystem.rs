use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{self, AtomicBool};
use std::sync::Arc;

use bfs_codec::{KeyCodec, SEPARATOR};
use bfs_store::{ObjectClient, ObjectMetadata};
use tracing::{debug, info};

use crate::attributes::{BasicAttributes, BASIC_VIEW};
use crate::config::FileSystemConfig;
use crate::endpoint::Endpoint;
use crate::error::{FsError, FsResult};
use crate::file_store::{FileStore, DEFAULT_STORE_NAME};
use crate::key::FileSystemKey;
use crate::path::BucketPath;
use crate::roots::RootDirectoryEnumerator;

/// One logical connection to an object store, viewed as a file system.
///
/// Each bucket is a root directory. Instances are shared through `Arc` and
/// are safe to use from many threads; the open flag is the only mutable
/// state. Equality, hashing and ordering go by [`FileSystemKey`] alone.
pub struct BucketFileSystem {
    key: FileSystemKey,
    scheme: String,
    client: Arc<dyn ObjectClient>,
    codec: KeyCodec,
    open: AtomicBool,
}

impl BucketFileSystem {
    /// Create an open file system over `client`.
    ///
    /// The encoding label in `config` is not checked here; an unknown label
    /// fails the first key conversion. [`FileSystemRegistry`] validates
    /// configs up front.
    ///
    /// [`FileSystemRegistry`]: crate::registry::FileSystemRegistry
    pub fn new(
        key: FileSystemKey,
        client: Arc<dyn ObjectClient>,
        config: &FileSystemConfig,
    ) -> Self {
        Self {
            key,
            scheme: config.scheme.clone(),
            client,
            codec: config.codec(),
            open: AtomicBool::new(true),
        }
    }

    pub fn key(&self) -> &FileSystemKey {
        &self.key
    }

    pub fn host(&self) -> Option<&str> {
        self.key.host()
    }

    pub fn access_key(&self) -> Option<&str> {
        self.key.access_key()
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    pub fn separator(&self) -> &'static str {
        "/"
    }

    /// Always `false`: objects can be written even though the attribute
    /// views are minimal.
    pub fn is_read_only(&self) -> bool {
        false
    }

    pub fn supported_file_attribute_views(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([BASIC_VIEW])
    }

    // ---- Lifecycle ----

    pub fn is_open(&self) -> bool {
        self.open.load(atomic::Ordering::SeqCst)
    }

    /// Mark the file system closed. Closing again does nothing.
    pub fn close(&self) {
        if self.open.swap(false, atomic::Ordering::SeqCst) {
            info!(fs = %self.key, id = %self.key.short_id(), "file system closed");
        }
    }

    pub(crate) fn ensure_open(&self) -> FsResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(FsError::Closed(self.key.clone()))
        }
    }

    // ---- Paths and keys ----

    /// Build a path from `first` joined with `more`, bound to this file system.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use bfs_fs::{BucketFileSystem, FileSystemConfig, FileSystemKey};
    /// use bfs_store::InMemoryObjectClient;
    ///
    /// let fs = Arc::new(BucketFileSystem::new(
    ///     FileSystemKey::new(Some("host"), None),
    ///     Arc::new(InMemoryObjectClient::new()),
    ///     &FileSystemConfig::default(),
    /// ));
    /// let a = fs.get_path("/bucket//dir", &["dir//file"]).unwrap();
    /// let b = fs.get_path("/bucket/dir/dir/file", &[]).unwrap();
    /// assert_eq!(a, b);
    /// assert!(fs.get_path("//path/to/file", &[]).is_err());
    /// ```
    pub fn get_path(self: &Arc<Self>, first: &str, more: &[&str]) -> FsResult<BucketPath> {
        self.ensure_open()?;
        BucketPath::parse(self.clone(), first, more)
    }

    /// Split an escaped key into `[root_marker, bucket, segment…]`.
    pub fn key_to_parts(&self, key: &str) -> FsResult<Vec<String>> {
        Ok(self.codec.key_to_parts(key)?)
    }

    /// Join parts into an escaped key.
    pub fn parts_to_key<S: AsRef<str>>(&self, parts: &[S]) -> FsResult<String> {
        Ok(self.codec.parts_to_key(parts)?)
    }

    /// Parse a path URI produced by [`BucketPath::to_uri`].
    pub fn path_from_uri(self: &Arc<Self>, uri: &str) -> FsResult<BucketPath> {
        self.ensure_open()?;
        let (endpoint, key) = Endpoint::split(uri)?;
        if !endpoint.scheme().eq_ignore_ascii_case(&self.scheme) || endpoint.key() != self.key {
            return Err(FsError::invalid_uri(
                uri,
                format!("does not belong to file system {}", self.key),
            ));
        }
        let mut parts = self.key_to_parts(key)?.into_iter();
        if parts.next().as_deref() != Some("") {
            return Err(FsError::invalid_uri(uri, "path must be absolute"));
        }
        let bucket = parts
            .next()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| FsError::invalid_uri(uri, "path must start with a bucket name"))?;
        let segments: Vec<String> = parts.filter(|s| !s.is_empty()).collect();
        if bucket.contains(SEPARATOR) || segments.iter().any(|s| s.contains(SEPARATOR)) {
            return Err(FsError::invalid_uri(uri, "escaped separator inside a name"));
        }
        Ok(BucketPath::from_parts(self.clone(), Some(bucket), segments))
    }

    // ---- Roots and stores ----

    /// One root path per bucket, in the order the store lists them.
    pub fn root_directories(self: &Arc<Self>) -> FsResult<Vec<BucketPath>> {
        self.ensure_open()?;
        let names = RootDirectoryEnumerator::new(self.client.as_ref()).bucket_names()?;
        Ok(names
            .into_iter()
            .map(|name| BucketPath::from_parts(self.clone(), Some(name), Vec::new()))
            .collect())
    }

    /// One store per bucket, or a single default store if there are none.
    pub fn file_stores(&self) -> FsResult<Vec<FileStore>> {
        self.ensure_open()?;
        let names = RootDirectoryEnumerator::new(self.client.as_ref()).bucket_names()?;
        if names.is_empty() {
            return Ok(vec![FileStore::new(self.key.clone(), DEFAULT_STORE_NAME)]);
        }
        Ok(names
            .into_iter()
            .map(|name| FileStore::new(self.key.clone(), name))
            .collect())
    }

    // ---- Store-backed operations ----

    /// Bucket and raw object key of an absolute path on this file system.
    fn locate<'p>(&self, path: &'p BucketPath) -> FsResult<(&'p str, String)> {
        self.ensure_open()?;
        if path.file_system().key() != &self.key {
            return Err(FsError::ForeignPath {
                path: path.to_string(),
                expected: self.key.clone(),
                found: path.file_system().key().clone(),
            });
        }
        match (path.bucket(), path.object_key()) {
            (Some(bucket), Some(key)) => Ok((bucket, key)),
            _ => Err(FsError::invalid_path(path.to_string(), "path must be absolute")),
        }
    }

    fn locate_object<'p>(&self, path: &'p BucketPath) -> FsResult<(&'p str, String)> {
        let (bucket, key) = self.locate(path)?;
        if key.is_empty() {
            return Err(FsError::invalid_path(
                path.to_string(),
                "a bucket root is not an object",
            ));
        }
        Ok((bucket, key))
    }

    /// Basic attributes of whatever the path names.
    pub fn read_attributes(&self, path: &BucketPath) -> FsResult<BasicAttributes> {
        let (bucket, key) = self.locate(path)?;
        if key.is_empty() {
            return if RootDirectoryEnumerator::new(self.client.as_ref()).is_valid_root(bucket)? {
                Ok(BasicAttributes::directory(None))
            } else {
                Err(FsError::NotFound(path.to_string()))
            };
        }
        if let Some(meta) = self.client.head_object(bucket, &key)? {
            return Ok(BasicAttributes::file(&meta));
        }
        let prefix = format!("{key}{SEPARATOR}");
        if let Some(marker) = self.client.head_object(bucket, &prefix)? {
            return Ok(BasicAttributes::directory(Some(marker.last_modified)));
        }
        if !self
            .client
            .list_objects(bucket, &prefix, Some(SEPARATOR))?
            .is_empty()
        {
            return Ok(BasicAttributes::directory(None));
        }
        Err(FsError::NotFound(path.to_string()))
    }

    /// Direct children of a directory, sorted by name.
    pub fn read_dir(self: &Arc<Self>, path: &BucketPath) -> FsResult<Vec<BucketPath>> {
        let (bucket, key) = self.locate(path)?;
        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{key}{SEPARATOR}")
        };
        let listing = self.client.list_objects(bucket, &prefix, Some(SEPARATOR))?;
        if listing.is_empty() && !key.is_empty() {
            return Err(match self.client.head_object(bucket, &key)? {
                Some(_) => FsError::NotADirectory(path.to_string()),
                None => FsError::NotFound(path.to_string()),
            });
        }

        let names: BTreeSet<&str> = listing
            .objects
            .iter()
            .map(|o| &o.key[prefix.len()..])
            .chain(listing.common_prefixes.iter().map(|p| {
                p[prefix.len()..].trim_end_matches(SEPARATOR)
            }))
            .filter(|name| !name.is_empty())
            .collect();
        debug!(path = %path, children = names.len(), "listed directory");

        Ok(names
            .into_iter()
            .map(|name| {
                let mut segments = path.segments().to_vec();
                segments.push(name.to_string());
                BucketPath::from_parts(self.clone(), Some(bucket.to_string()), segments)
            })
            .collect())
    }

    /// Read the full content of an object.
    pub fn read(&self, path: &BucketPath) -> FsResult<Vec<u8>> {
        let (bucket, key) = self.locate_object(path)?;
        self.client
            .get_object(bucket, &key)?
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    /// Create or replace an object.
    pub fn write(&self, path: &BucketPath, data: &[u8]) -> FsResult<ObjectMetadata> {
        let (bucket, key) = self.locate_object(path)?;
        let meta = self.client.put_object(bucket, &key, data)?;
        debug!(path = %path, size = meta.size, "object written");
        Ok(meta)
    }

    /// Create a directory by writing an empty `key/` marker object.
    pub fn create_directory(&self, path: &BucketPath) -> FsResult<()> {
        let (bucket, key) = self.locate_object(path)?;
        self.client
            .put_object(bucket, &format!("{key}{SEPARATOR}"), &[])?;
        debug!(path = %path, "directory created");
        Ok(())
    }

    /// Delete an object, or an empty directory and its marker.
    pub fn delete(&self, path: &BucketPath) -> FsResult<()> {
        let (bucket, key) = self.locate_object(path)?;
        if self.client.delete_object(bucket, &key)? {
            debug!(path = %path, "object deleted");
            return Ok(());
        }
        let prefix = format!("{key}{SEPARATOR}");
        let listing = self.client.list_objects(bucket, &prefix, Some(SEPARATOR))?;
        let has_children = !listing.common_prefixes.is_empty()
            || listing.objects.iter().any(|o| o.key != prefix);
        if has_children {
            return Err(FsError::DirectoryNotEmpty(path.to_string()));
        }
        if self.client.delete_object(bucket, &prefix)? {
            debug!(path = %path, "directory deleted");
            return Ok(());
        }
        Err(FsError::NotFound(path.to_string()))
    }
}

impl PartialEq for BucketFileSystem {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for BucketFileSystem {}

impl Hash for BucketFileSystem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Ord for BucketFileSystem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl PartialOrd for BucketFileSystem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for BucketFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketFileSystem")
            .field("key", &self.key)
            .field("scheme", &self.scheme)
            .field("encoding", &self.codec.label())
            .field("open", &self.is_open())
            .finish()
    }
}
