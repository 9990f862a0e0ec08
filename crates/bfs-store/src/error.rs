/// Errors from object store client operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The named bucket does not exist.
    #[error("no such bucket: {0}")]
    NoSuchBucket(String),

    /// A bucket with this name already exists.
    #[error("bucket already exists: {0}")]
    BucketAlreadyExists(String),

    /// The bucket name is not acceptable to the store.
    #[error("invalid bucket name {name:?}: {reason}")]
    InvalidBucketName { name: String, reason: String },

    /// The bucket still holds objects and cannot be removed.
    #[error("bucket not empty: {0}")]
    BucketNotEmpty(String),

    /// The backend rejected or failed the request.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error from the underlying transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
