//! Registry of open file systems, one per connection identity.
//!
//! The registry is an ordinary value: build it at startup, share it, and
//! call [`FileSystemRegistry::shutdown`] to close everything it handed out.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bfs_store::{ObjectClient, StoreResult};
use tracing::{debug, info};

use crate::config::FileSystemConfig;
use crate::endpoint::Endpoint;
use crate::error::{FsError, FsResult};
use crate::filesystem::BucketFileSystem;
use crate::key::FileSystemKey;

/// Opens object store clients for endpoints.
pub trait ClientFactory: Send + Sync {
    fn connect(&self, endpoint: &Endpoint) -> StoreResult<Arc<dyn ObjectClient>>;
}

/// Factory that hands the same client to every endpoint.
///
/// Useful with [`bfs_store::InMemoryObjectClient`] in tests and embeddings.
pub struct SharedClientFactory {
    client: Arc<dyn ObjectClient>,
}

impl SharedClientFactory {
    pub fn new(client: Arc<dyn ObjectClient>) -> Self {
        Self { client }
    }
}

impl ClientFactory for SharedClientFactory {
    fn connect(&self, _endpoint: &Endpoint) -> StoreResult<Arc<dyn ObjectClient>> {
        Ok(self.client.clone())
    }
}

/// Caches one open [`BucketFileSystem`] per [`FileSystemKey`].
///
/// Closed file systems stay in the map until the next lookup for their key
/// evicts them.
pub struct FileSystemRegistry {
    factory: Arc<dyn ClientFactory>,
    config: FileSystemConfig,
    systems: RwLock<HashMap<FileSystemKey, Arc<BucketFileSystem>>>,
}

impl FileSystemRegistry {
    /// Create an empty registry. Fails if `config` is invalid, including an
    /// unknown encoding label.
    pub fn new(factory: Arc<dyn ClientFactory>, config: FileSystemConfig) -> FsResult<Self> {
        config.validate()?;
        Ok(Self {
            factory,
            config,
            systems: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &FileSystemConfig {
        &self.config
    }

    fn endpoint(&self, uri: &str) -> FsResult<Endpoint> {
        let endpoint = Endpoint::parse(uri)?;
        if !endpoint.scheme().eq_ignore_ascii_case(&self.config.scheme) {
            return Err(FsError::invalid_uri(
                uri,
                format!("expected scheme {:?}", self.config.scheme),
            ));
        }
        Ok(endpoint)
    }

    /// Connect and build a file system. Runs without holding the map lock,
    /// so a slow endpoint never stalls lookups for other identities.
    fn open(&self, endpoint: &Endpoint) -> FsResult<Arc<BucketFileSystem>> {
        let client = self.factory.connect(endpoint)?;
        Ok(Arc::new(BucketFileSystem::new(endpoint.key(), client, &self.config)))
    }

    fn cached(&self, key: &FileSystemKey) -> Option<Arc<BucketFileSystem>> {
        let systems = self.systems.read().expect("lock poisoned");
        systems.get(key).filter(|fs| fs.is_open()).cloned()
    }

    /// Create a file system for `uri`.
    ///
    /// Fails with [`FsError::AlreadyExists`] if an open one is registered for
    /// the same identity, including one registered while this call was
    /// connecting.
    pub fn new_file_system(&self, uri: &str) -> FsResult<Arc<BucketFileSystem>> {
        let endpoint = self.endpoint(uri)?;
        let key = endpoint.key();
        if self.cached(&key).is_some() {
            return Err(FsError::AlreadyExists(key));
        }
        let fs = self.open(&endpoint)?;

        let mut systems = self.systems.write().expect("lock poisoned");
        if systems.get(&key).is_some_and(|fs| fs.is_open()) {
            return Err(FsError::AlreadyExists(key));
        }
        systems.insert(key, fs.clone());
        info!(endpoint = %endpoint, id = %fs.key().short_id(), "file system created");
        Ok(fs)
    }

    /// The open file system registered for `uri`'s identity.
    pub fn get_file_system(&self, uri: &str) -> FsResult<Arc<BucketFileSystem>> {
        let key = self.endpoint(uri)?.key();
        {
            let systems = self.systems.read().expect("lock poisoned");
            match systems.get(&key) {
                Some(fs) if fs.is_open() => return Ok(fs.clone()),
                None => return Err(FsError::FileSystemNotFound(key)),
                Some(_) => {}
            }
        }
        self.evict_closed(&key);
        Err(FsError::FileSystemNotFound(key))
    }

    /// The registered file system for `uri`, creating it if needed.
    ///
    /// Concurrent callers for a new identity may each connect; the first to
    /// register wins and the others drop their client and return it.
    pub fn get_or_create(&self, uri: &str) -> FsResult<Arc<BucketFileSystem>> {
        let endpoint = self.endpoint(uri)?;
        let key = endpoint.key();
        if let Some(fs) = self.cached(&key) {
            return Ok(fs);
        }
        let fs = self.open(&endpoint)?;

        let mut systems = self.systems.write().expect("lock poisoned");
        if let Some(existing) = systems.get(&key).filter(|fs| fs.is_open()) {
            debug!(fs = %key, "discarding duplicate connection");
            return Ok(existing.clone());
        }
        systems.insert(key, fs.clone());
        info!(endpoint = %endpoint, id = %fs.key().short_id(), "file system created");
        Ok(fs)
    }

    fn evict_closed(&self, key: &FileSystemKey) {
        let mut systems = self.systems.write().expect("lock poisoned");
        if systems.get(key).is_some_and(|fs| !fs.is_open()) {
            systems.remove(key);
            debug!(fs = %key, "evicted closed file system");
        }
    }

    /// Remove the entry for `key` without closing it.
    pub fn remove(&self, key: &FileSystemKey) -> Option<Arc<BucketFileSystem>> {
        self.systems.write().expect("lock poisoned").remove(key)
    }

    /// Number of registered entries, open or not yet evicted.
    pub fn len(&self) -> usize {
        self.systems.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close and remove every registered file system. Returns how many were
    /// still open.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<Arc<BucketFileSystem>> = self
            .systems
            .write()
            .expect("lock poisoned")
            .drain()
            .map(|(_, fs)| fs)
            .collect();
        let open = drained.iter().filter(|fs| fs.is_open()).count();
        for fs in &drained {
            fs.close();
        }
        info!(closed = open, "registry shut down");
        open
    }
}

impl std::fmt::Debug for FileSystemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemRegistry")
            .field("config", &self.config)
            .field("registered", &self.len())
            .finish()
    }
}
