//! Key codec for bucketfs.
//!
//! Converts between an ordered list of path segments and the textual key
//! form used in bucketfs URIs (`/bucket/folder%20with%20spaces/file`).
//! Reserved characters are percent-escaped; the bytes behind each escape
//! come from a configurable [`TextEncoding`] (UTF-8 by default).
//!
//! # Modules
//!
//! - [`error`] — [`CodecError`] and the [`UnknownEncoding`] lookup failure
//! - [`encoding`] — the supported [`TextEncoding`]s and their labels
//! - [`codec`] — [`KeyCodec`], the segment/key conversion itself
//!
//! # Rules
//!
//! 1. The separator is always `/`; it is never escaped when joining parts.
//! 2. Unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through untouched.
//! 3. Encoding labels are resolved on use. An unknown label fails every
//!    conversion with [`CodecError::UnsupportedEncoding`], in both directions.

pub mod codec;
pub mod encoding;
pub mod error;

pub use codec::{escape_userinfo, unescape_userinfo, KeyCodec, SEPARATOR};
pub use encoding::TextEncoding;
pub use error::{CodecError, CodecResult, UnknownEncoding};
