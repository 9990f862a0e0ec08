//! Error types for file system and path operations.

use bfs_codec::CodecError;
use bfs_store::StoreError;
use thiserror::Error;

use crate::key::FileSystemKey;
use crate::unsupported::Capability;

/// Errors that can occur in bucketfs file system operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// The path text or path argument is not acceptable.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The connection or path URI could not be parsed or does not apply.
    #[error("invalid URI {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Key conversion failed. An unknown encoding keeps its lookup failure
    /// as the source.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The capability is not modeled by the object store mapping.
    #[error("{0} is not supported")]
    Unsupported(Capability),

    /// The file system has been closed.
    #[error("file system {0} is closed")]
    Closed(FileSystemKey),

    /// An open file system is already registered for this key.
    #[error("file system already exists: {0}")]
    AlreadyExists(FileSystemKey),

    /// No open file system is registered for this key.
    #[error("file system not found: {0}")]
    FileSystemNotFound(FileSystemKey),

    /// The path belongs to a different file system.
    #[error("path {path} belongs to file system {found}, not {expected}")]
    ForeignPath {
        path: String,
        expected: FileSystemKey,
        found: FileSystemKey,
    },

    /// Nothing exists at the path.
    #[error("no such file or directory: {0}")]
    NotFound(String),

    /// The path names an object, not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The directory still has children.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// The object store client failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The configuration is malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error while loading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_uri(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for file system operations.
pub type FsResult<T> = Result<T, FsError>;
