use std::fmt;

use bfs_codec::escape_userinfo;
use serde::{Deserialize, Serialize};

/// Identity of one logical connection to an object store endpoint.
///
/// Two keys are equal iff their access keys and hosts are equal. A missing
/// access key is distinct from every present one, including the empty
/// string; a missing host means the default endpoint.
///
/// Ordering compares the access key first, then the host, with `None`
/// sorting before any present value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileSystemKey {
    access_key: Option<String>,
    host: Option<String>,
}

impl FileSystemKey {
    pub fn new(host: Option<&str>, access_key: Option<&str>) -> Self {
        Self {
            access_key: access_key.map(str::to_string),
            host: host.map(str::to_string),
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    /// URI authority without secrets: `access@host`, `host`, or empty.
    ///
    /// The access key is percent-escaped so it parses back unchanged.
    pub fn authority(&self) -> String {
        let access = self.access_key.as_deref().map(escape_userinfo);
        match (access, &self.host) {
            (Some(a), Some(h)) => format!("{a}@{h}"),
            (Some(a), None) => format!("{a}@"),
            (None, Some(h)) => h.clone(),
            (None, None) => String::new(),
        }
    }

    /// Stable BLAKE3 fingerprint of the key.
    ///
    /// Presence is hashed explicitly, so `None` and `Some("")` differ.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"bfs-filesystem-v1:");
        for field in [&self.access_key, &self.host] {
            match field {
                Some(value) => {
                    hasher.update(&[1]);
                    hasher.update(&(value.len() as u64).to_le_bytes());
                    hasher.update(value.as_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
        *hasher.finalize().as_bytes()
    }

    /// Short identifier (first 8 hex characters of the fingerprint).
    pub fn short_id(&self) -> String {
        format!("fs:{}", hex::encode(&self.fingerprint()[..4]))
    }
}

impl fmt::Debug for FileSystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileSystemKey({self})")
    }
}

impl fmt::Display for FileSystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authority = self.authority();
        if authority.is_empty() {
            f.write_str("<default>")
        } else {
            f.write_str(&authority)
        }
    }
}
