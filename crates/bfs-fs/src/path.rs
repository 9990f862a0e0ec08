//! Paths over buckets and keys.
//!
//! A [`BucketPath`] is either absolute (`/bucket/seg/seg`, rooted at a
//! bucket) or relative (`seg/seg`). Repeated separators collapse, so no
//! path ever holds an empty segment. Every path is bound to the
//! [`BucketFileSystem`] that created it; paths from different file systems
//! never compare equal.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::sync::Arc;

use bfs_codec::SEPARATOR;

use crate::error::{FsError, FsResult};
use crate::filesystem::BucketFileSystem;

/// An immutable path bound to a file system.
#[derive(Clone)]
pub struct BucketPath {
    fs: Arc<BucketFileSystem>,
    bucket: Option<String>,
    segments: Vec<String>,
}

impl BucketPath {
    /// Join `first` and `more` into a path.
    ///
    /// Only `first` decides whether the path is absolute. In an absolute
    /// path the first component after the separator is the bucket and must
    /// not be empty.
    pub(crate) fn parse(
        fs: Arc<BucketFileSystem>,
        first: &str,
        more: &[&str],
    ) -> FsResult<Self> {
        let mut components = first.split(SEPARATOR);
        let bucket = if first.starts_with(SEPARATOR) {
            components.next();
            match components.next() {
                Some(bucket) if !bucket.is_empty() => Some(bucket.to_string()),
                _ => {
                    let mut text = first.to_string();
                    for m in more {
                        text.push(SEPARATOR);
                        text.push_str(m);
                    }
                    return Err(FsError::invalid_path(
                        text,
                        "absolute path must start with a bucket name",
                    ));
                }
            }
        } else {
            None
        };
        let segments = components
            .chain(more.iter().flat_map(|m| m.split(SEPARATOR)))
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self {
            fs,
            bucket,
            segments,
        })
    }

    pub(crate) fn from_parts(
        fs: Arc<BucketFileSystem>,
        bucket: Option<String>,
        segments: Vec<String>,
    ) -> Self {
        debug_assert!(segments.iter().all(|s| !s.is_empty() && !s.contains(SEPARATOR)));
        Self {
            fs,
            bucket,
            segments,
        }
    }

    fn with_segments(&self, bucket: Option<String>, segments: Vec<String>) -> Self {
        Self::from_parts(self.fs.clone(), bucket, segments)
    }

    /// The file system this path belongs to.
    pub fn file_system(&self) -> &Arc<BucketFileSystem> {
        &self.fs
    }

    pub fn is_absolute(&self) -> bool {
        self.bucket.is_some()
    }

    /// The bucket of an absolute path.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Segments below the bucket (absolute) or all segments (relative).
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `true` for a bare `/bucket` path.
    pub fn is_root(&self) -> bool {
        self.bucket.is_some() && self.segments.is_empty()
    }

    /// Number of segments. The bucket of an absolute path is its root, not a
    /// name, and is not counted.
    pub fn name_count(&self) -> usize {
        self.segments.len()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// The last segment, or the bucket name of a root path.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str).or(self.bucket())
    }

    /// The path without its last segment.
    ///
    /// A root has no parent, nor does a single-segment relative path.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        if self.bucket.is_none() && init.is_empty() {
            return None;
        }
        Some(self.with_segments(self.bucket.clone(), init.to_vec()))
    }

    /// The `/bucket` root of an absolute path.
    pub fn root(&self) -> Option<Self> {
        let bucket = self.bucket.clone()?;
        Some(self.with_segments(Some(bucket), Vec::new()))
    }

    /// Resolve path text against this path. Fails once the file system is
    /// closed, like [`BucketFileSystem::get_path`].
    pub fn join(&self, other: &str) -> FsResult<Self> {
        self.fs.ensure_open()?;
        let other = Self::parse(self.fs.clone(), other, &[])?;
        self.resolve(&other)
    }

    /// Resolve `other` against this path.
    ///
    /// An absolute `other` is returned unchanged; a relative one is appended.
    pub fn resolve(&self, other: &Self) -> FsResult<Self> {
        self.check_same_fs(other)?;
        if other.is_absolute() {
            return Ok(other.clone());
        }
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Ok(self.with_segments(self.bucket.clone(), segments))
    }

    /// Component-wise prefix test. Root presence and bucket must match.
    pub fn starts_with(&self, other: &Self) -> bool {
        self.fs.key() == other.fs.key()
            && self.bucket == other.bucket
            && self.segments.starts_with(&other.segments)
    }

    /// Component-wise suffix test.
    ///
    /// An absolute `other` only matches an equal path.
    pub fn ends_with(&self, other: &Self) -> bool {
        if self.fs.key() != other.fs.key() {
            return false;
        }
        if other.is_absolute() {
            return self == other;
        }
        self.segments.ends_with(&other.segments)
    }

    /// The relative path that leads from `base` to this path.
    pub fn strip_prefix(&self, base: &Self) -> FsResult<Self> {
        if !self.starts_with(base) {
            return Err(FsError::invalid_path(
                self.to_string(),
                format!("does not start with {base}"),
            ));
        }
        Ok(self.with_segments(None, self.segments[base.segments.len()..].to_vec()))
    }

    /// Relative path over segments `begin..end`.
    pub fn subpath(&self, begin: usize, end: usize) -> FsResult<Self> {
        if begin >= end || end > self.segments.len() {
            return Err(FsError::invalid_path(
                self.to_string(),
                format!("invalid subpath range {begin}..{end}"),
            ));
        }
        Ok(self.with_segments(None, self.segments[begin..end].to_vec()))
    }

    /// Raw object key below the bucket (empty for a root). `None` for a
    /// relative path.
    pub fn object_key(&self) -> Option<String> {
        self.bucket.as_ref()?;
        let separator = SEPARATOR.to_string();
        Some(self.segments.join(separator.as_str()))
    }

    /// Render as `scheme://authority/bucket/escaped/key`.
    pub fn to_uri(&self) -> FsResult<String> {
        let bucket = self.bucket.as_ref().ok_or_else(|| {
            FsError::invalid_path(self.to_string(), "relative paths have no URI")
        })?;
        let parts: Vec<String> = iter::once(format!("{SEPARATOR}{bucket}"))
            .chain(self.segments.iter().cloned())
            .collect();
        let key = self.fs.parts_to_key(&parts)?;
        Ok(format!(
            "{}://{}{}",
            self.fs.scheme(),
            self.fs.key().authority(),
            key
        ))
    }

    pub(crate) fn check_same_fs(&self, other: &Self) -> FsResult<()> {
        if self.fs.key() != other.fs.key() {
            return Err(FsError::ForeignPath {
                path: other.to_string(),
                expected: self.fs.key().clone(),
                found: other.fs.key().clone(),
            });
        }
        Ok(())
    }

    /// Characters of the rendered form, without allocating.
    fn rendered(&self) -> impl Iterator<Item = char> + '_ {
        let root = self
            .bucket
            .iter()
            .flat_map(|b| iter::once(SEPARATOR).chain(b.chars()));
        let absolute = self.bucket.is_some();
        let body = self.segments.iter().enumerate().flat_map(move |(i, s)| {
            let sep = (absolute || i > 0).then_some(SEPARATOR);
            sep.into_iter().chain(s.chars())
        });
        root.chain(body)
    }
}

impl fmt::Display for BucketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(bucket) = &self.bucket {
            write!(f, "{SEPARATOR}{bucket}")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if self.bucket.is_some() || i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for BucketPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketPath")
            .field("fs", self.fs.key())
            .field("path", &self.to_string())
            .finish()
    }
}

impl PartialEq for BucketPath {
    fn eq(&self, other: &Self) -> bool {
        self.fs.key() == other.fs.key()
            && self.bucket == other.bucket
            && self.segments == other.segments
    }
}

impl Eq for BucketPath {}

impl Hash for BucketPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fs.key().hash(state);
        self.bucket.hash(state);
        self.segments.hash(state);
    }
}

impl Ord for BucketPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fs
            .key()
            .cmp(other.fs.key())
            .then_with(|| self.rendered().cmp(other.rendered()))
    }
}

impl PartialOrd for BucketPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
