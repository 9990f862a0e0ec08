use std::path::Path;

use bfs_codec::{KeyCodec, TextEncoding};
use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};

/// Default URI scheme for bucketfs connections.
pub const DEFAULT_SCHEME: &str = "s3";

/// Settings shared by every file system a registry creates.
///
/// ```toml
/// scheme = "s3"
/// encoding = "UTF-8"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSystemConfig {
    /// URI scheme accepted by the registry and used when rendering path URIs.
    pub scheme: String,
    /// Text encoding label used to escape and unescape keys.
    pub encoding: String,
}

impl Default for FileSystemConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.into(),
            encoding: TextEncoding::Utf8.name().into(),
        }
    }
}

impl FileSystemConfig {
    /// Config with the given encoding label and default scheme.
    pub fn with_encoding(encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
            ..Self::default()
        }
    }

    /// Parse from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> FsResult<Self> {
        toml::from_str(text).map_err(|e| FsError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> FsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check that the scheme is usable and the encoding label is known.
    pub fn validate(&self) -> FsResult<()> {
        let scheme_ok = self
            .scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && self
                .scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(FsError::Config(format!("invalid scheme {:?}", self.scheme)));
        }
        self.codec().encoding()?;
        Ok(())
    }

    /// The key codec for this configuration.
    pub fn codec(&self) -> KeyCodec {
        KeyCodec::new(self.encoding.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use bfs_codec::CodecError;

    use super::*;

    #[test]
    fn default_config() {
        let c = FileSystemConfig::default();
        assert_eq!(c.scheme, "s3");
        assert_eq!(c.encoding, "UTF-8");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let c = FileSystemConfig::from_toml_str("encoding = \"ISO-8859-1\"").unwrap();
        assert_eq!(c.encoding, "ISO-8859-1");
        assert_eq!(c.scheme, "s3");

        let c = FileSystemConfig::from_toml_str("").unwrap();
        assert_eq!(c, FileSystemConfig::default());
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = FileSystemConfig::from_toml_str("encoding = ").unwrap_err();
        assert!(matches!(err, FsError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scheme = \"bfs\"\nencoding = \"latin1\"").unwrap();
        let c = FileSystemConfig::load(file.path()).unwrap();
        assert_eq!(c.scheme, "bfs");
        assert_eq!(c.codec().encoding().unwrap(), TextEncoding::Iso8859_1);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSystemConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, FsError::Io(_)));
    }

    #[test]
    fn validate_rejects_unknown_encoding() {
        let err = FileSystemConfig::with_encoding("unknown").validate().unwrap_err();
        assert!(matches!(
            err,
            FsError::Codec(CodecError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_scheme() {
        let c = FileSystemConfig {
            scheme: "3s".into(),
            ..FileSystemConfig::default()
        };
        assert!(matches!(c.validate(), Err(FsError::Config(_))));
    }
}
