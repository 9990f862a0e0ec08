//! Capabilities the object store mapping does not model.
//!
//! The core [`BucketFileSystem`] only implements what it supports. This
//! adapter is the single place that turns a request for anything else into
//! [`FsError::Unsupported`]. Success is uninhabited (`Infallible`), so
//! callers can see from the signature that these never succeed.

use std::convert::Infallible;
use std::fmt;

use crate::error::{FsError, FsResult};
use crate::filesystem::BucketFileSystem;

/// A file system capability that bucketfs does not model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    PathMatcher,
    UserPrincipalLookup,
    WatchService,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathMatcher => write!(f, "path matcher"),
            Self::UserPrincipalLookup => write!(f, "user principal lookup"),
            Self::WatchService => write!(f, "watch service"),
        }
    }
}

/// Operations a hierarchical file system usually offers but an object
/// store cannot back. Every method fails with [`FsError::Unsupported`].
pub trait UnmodeledCapabilities {
    /// Glob/regex path matching.
    fn path_matcher(&self, _syntax_and_pattern: &str) -> FsResult<Infallible> {
        Err(FsError::Unsupported(Capability::PathMatcher))
    }

    /// Owner and group lookup.
    fn user_principal_lookup_service(&self) -> FsResult<Infallible> {
        Err(FsError::Unsupported(Capability::UserPrincipalLookup))
    }

    /// Change notification.
    fn new_watch_service(&self) -> FsResult<Infallible> {
        Err(FsError::Unsupported(Capability::WatchService))
    }
}

impl UnmodeledCapabilities for BucketFileSystem {}
