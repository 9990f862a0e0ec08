//! Connection URI parsing.
//!
//! A connection URI has the form `scheme://[access[:secret]@]host[/path]`.
//! The authority identifies the file system; anything from the first `/`
//! after it is the path part, which [`Endpoint::split`] hands back untouched.

use std::fmt;

use bfs_codec::unescape_userinfo;
use url::Url;

use crate::error::{FsError, FsResult};
use crate::key::FileSystemKey;

/// Parsed connection target: scheme, host and optional credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
}

impl Endpoint {
    /// Parse a connection URI, ignoring any path part.
    ///
    /// # Examples
    ///
    /// ```
    /// use bfs_fs::Endpoint;
    ///
    /// let ep = Endpoint::parse("s3://accessKey:secretKey@mirror1.amazon.test/").unwrap();
    /// assert_eq!(ep.host(), Some("mirror1.amazon.test"));
    /// assert_eq!(ep.access_key(), Some("accessKey"));
    ///
    /// let anon = Endpoint::parse("s3://mirror1.amazon.test").unwrap();
    /// assert_eq!(anon.access_key(), None);
    /// ```
    pub fn parse(uri: &str) -> FsResult<Self> {
        Self::split(uri).map(|(endpoint, _)| endpoint)
    }

    /// Parse a URI into its endpoint and its (still escaped) path part.
    ///
    /// Userinfo is percent-decoded. The path is sliced from `uri` as given:
    /// [`Url`] would drop `.` and `..` segments, which are ordinary names
    /// in a key.
    pub fn split(uri: &str) -> FsResult<(Self, &str)> {
        let url = Url::parse(uri).map_err(|e| FsError::invalid_uri(uri, e.to_string()))?;
        if !url.has_authority() {
            return Err(FsError::invalid_uri(uri, "missing \"://\""));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(FsError::invalid_uri(uri, "query and fragment are not supported"));
        }

        let (_, rest) = uri
            .split_once("://")
            .ok_or_else(|| FsError::invalid_uri(uri, "missing \"://\""))?;
        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (authority, path) = rest.split_at(authority_end);

        let decode = |raw: &str| {
            unescape_userinfo(raw)
                .map_err(|e| FsError::invalid_uri(uri, format!("bad userinfo: {e}")))
        };
        // An empty user is still a present access key.
        let access_key = if authority.contains('@') {
            Some(decode(url.username())?)
        } else {
            None
        };
        let secret_key = url.password().map(decode).transpose()?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .map(|h| match url.port() {
                Some(port) => format!("{h}:{port}"),
                None => h.to_string(),
            });

        let endpoint = Self {
            scheme: url.scheme().to_string(),
            host,
            access_key,
            secret_key,
        };
        Ok((endpoint, path))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// The file system identity this endpoint resolves to.
    pub fn key(&self) -> FileSystemKey {
        FileSystemKey::new(self.host(), self.access_key())
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.key().authority())
    }
}
