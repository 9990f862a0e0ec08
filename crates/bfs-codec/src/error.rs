//! Error types for key codec operations.

use thiserror::Error;

/// Lookup failure for a text encoding label.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown text encoding: {label:?}")]
pub struct UnknownEncoding {
    pub label: String,
}

/// Errors produced while converting between segments and keys.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The configured encoding label is not recognized.
    ///
    /// The lookup failure is kept as the error source.
    #[error("unsupported encoding {:?}", .0.label)]
    UnsupportedEncoding(#[from] UnknownEncoding),

    /// A character has no representation in the configured encoding.
    #[error("character {ch:?} cannot be represented in {encoding}")]
    Unmappable { ch: char, encoding: &'static str },

    /// A `%` was not followed by two hex digits.
    #[error("malformed percent escape at offset {offset} in {input:?}")]
    MalformedEscape { input: String, offset: usize },

    /// Unescaped bytes are not valid in the configured encoding.
    #[error("escaped bytes in {input:?} are not valid {encoding}")]
    InvalidBytes { input: String, encoding: &'static str },
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
