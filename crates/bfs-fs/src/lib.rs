//! Hierarchical filesystem paths over object store buckets and keys.
//!
//! A [`BucketFileSystem`] is one logical connection to an object store,
//! identified by its endpoint host and optional access key. Each bucket is
//! a root directory, so `/bucket/dir/file` names the object `dir/file` in
//! `bucket`, while `dir/file` is a relative path with no bucket.
//!
//! # Architecture
//!
//! - **Paths** ([`BucketPath`]) are immutable values. Joining collapses
//!   repeated separators; only the first argument decides whether a path is
//!   absolute. Equality, hashing and ordering include the owning file system.
//! - **Identities** ([`FileSystemKey`]) compare by `(access_key, host)`; an
//!   absent access key differs from every present one.
//! - **Keys** convert to and from segments through [`bfs_codec::KeyCodec`]
//!   using the configured text encoding.
//! - **Roots** are enumerated from the store at call time through
//!   [`RootDirectoryEnumerator`].
//! - **Registry** ([`FileSystemRegistry`]) caches one open file system per
//!   identity and owns their teardown.
//!
//! # Modules
//!
//! - [`error`] — [`FsError`] and [`FsResult`]
//! - [`config`] — [`FileSystemConfig`]
//! - [`endpoint`] — connection URI parsing
//! - [`key`] — [`FileSystemKey`]
//! - [`path`] — [`BucketPath`]
//! - [`filesystem`] — [`BucketFileSystem`]
//! - [`roots`] — [`RootDirectoryEnumerator`]
//! - [`file_store`] — [`FileStore`]
//! - [`attributes`] — [`BasicAttributes`]
//! - [`unsupported`] — capabilities that always fail
//! - [`registry`] — [`FileSystemRegistry`] and [`ClientFactory`]

pub mod attributes;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod file_store;
pub mod filesystem;
pub mod key;
pub mod path;
pub mod registry;
pub mod roots;
pub mod unsupported;

pub use attributes::{BasicAttributes, EntryKind, BASIC_VIEW};
pub use config::FileSystemConfig;
pub use endpoint::Endpoint;
pub use error::{FsError, FsResult};
pub use file_store::FileStore;
pub use filesystem::BucketFileSystem;
pub use key::FileSystemKey;
pub use path::BucketPath;
pub use registry::{ClientFactory, FileSystemRegistry, SharedClientFactory};
pub use roots::RootDirectoryEnumerator;
pub use unsupported::{Capability, UnmodeledCapabilities};

// Re-export the separator so callers need not depend on the codec crate.
pub use bfs_codec::SEPARATOR;
