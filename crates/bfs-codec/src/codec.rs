use crate::encoding::TextEncoding;
use crate::error::{CodecError, CodecResult};

/// Path separator shared by keys, paths and URIs.
pub const SEPARATOR: char = '/';

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Converts between path segments and escaped key strings.
///
/// A codec only remembers the encoding *label* it was configured with. The
/// label is resolved on every conversion, so an unknown label is reported by
/// the first conversion attempt rather than at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyCodec {
    label: String,
}

impl KeyCodec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The configured encoding label, as given.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resolve the configured encoding.
    pub fn encoding(&self) -> CodecResult<TextEncoding> {
        Ok(TextEncoding::for_label(&self.label)?)
    }

    /// Join `parts` with `/`, escaping everything except unreserved
    /// characters and the separator itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use bfs_codec::KeyCodec;
    ///
    /// let codec = KeyCodec::default();
    /// let key = codec
    ///     .parts_to_key(&["/bucket", "folder with spaces", "file"])
    ///     .unwrap();
    /// assert_eq!(key, "/bucket/folder%20with%20spaces/file");
    /// ```
    pub fn parts_to_key<S: AsRef<str>>(&self, parts: &[S]) -> CodecResult<String> {
        let encoding = self.encoding()?;
        let mut key = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                key.push(SEPARATOR);
            }
            escape_into(encoding, part.as_ref(), true, &mut key)?;
        }
        Ok(key)
    }

    /// Split `key` on `/` and unescape every component.
    ///
    /// An absolute key yields an empty first slot (the root marker).
    ///
    /// # Examples
    ///
    /// ```
    /// use bfs_codec::KeyCodec;
    ///
    /// let codec = KeyCodec::default();
    /// let parts = codec.key_to_parts("/bucket/folder%20with%20spaces/file").unwrap();
    /// assert_eq!(parts, ["", "bucket", "folder with spaces", "file"]);
    /// ```
    pub fn key_to_parts(&self, key: &str) -> CodecResult<Vec<String>> {
        let encoding = self.encoding()?;
        key.split(SEPARATOR)
            .map(|component| unescape(encoding, component))
            .collect()
    }

    /// Escape a single segment. Unlike [`parts_to_key`](Self::parts_to_key)
    /// this also escapes `/`.
    pub fn encode_segment(&self, segment: &str) -> CodecResult<String> {
        let encoding = self.encoding()?;
        let mut out = String::with_capacity(segment.len());
        escape_into(encoding, segment, false, &mut out)?;
        Ok(out)
    }

    /// Unescape a single segment.
    pub fn decode_segment(&self, segment: &str) -> CodecResult<String> {
        unescape(self.encoding()?, segment)
    }
}

impl Default for KeyCodec {
    fn default() -> Self {
        Self::new(TextEncoding::Utf8.name())
    }
}

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '~')
}

fn escape_into(
    encoding: TextEncoding,
    input: &str,
    keep_separator: bool,
    out: &mut String,
) -> CodecResult<()> {
    let mut buf = Vec::with_capacity(4);
    for ch in input.chars() {
        if is_unreserved(ch) || (keep_separator && ch == SEPARATOR) {
            out.push(ch);
            continue;
        }
        buf.clear();
        encoding.encode_char(ch, &mut buf)?;
        buf.iter().for_each(|b| push_escaped(*b, out));
    }
    Ok(())
}

fn push_escaped(b: u8, out: &mut String) {
    out.push('%');
    out.push(HEX_UPPER[(b >> 4) as usize] as char);
    out.push(HEX_UPPER[(b & 0x0F) as usize] as char);
}

/// Escape URI userinfo (an access key) as UTF-8.
///
/// Only unreserved characters pass through, so `:`, `@`, `/` and `%` in the
/// input never change how the authority parses.
pub fn escape_userinfo(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut buf = [0u8; 4];
    for ch in input.chars() {
        if is_unreserved(ch) {
            out.push(ch);
        } else {
            ch.encode_utf8(&mut buf)
                .bytes()
                .for_each(|b| push_escaped(b, &mut out));
        }
    }
    out
}

/// Reverse [`escape_userinfo`].
pub fn unescape_userinfo(input: &str) -> CodecResult<String> {
    unescape(TextEncoding::Utf8, input)
}

fn unescape(encoding: TextEncoding, input: &str) -> CodecResult<String> {
    let mut bytes = Vec::with_capacity(input.len());
    let mut chars = input.char_indices();
    while let Some((offset, ch)) = chars.next() {
        if ch != '%' {
            encoding.encode_char(ch, &mut bytes)?;
            continue;
        }
        let hi = chars.next().and_then(|(_, c)| c.to_digit(16));
        let lo = chars.next().and_then(|(_, c)| c.to_digit(16));
        match (hi, lo) {
            (Some(hi), Some(lo)) => bytes.push((hi << 4 | lo) as u8),
            _ => {
                return Err(CodecError::MalformedEscape {
                    input: input.to_string(),
                    offset,
                })
            }
        }
    }
    encoding
        .decode(bytes)
        .ok_or_else(|| CodecError::InvalidBytes {
            input: input.to_string(),
            encoding: encoding.name(),
        })
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use proptest::prelude::*;

    use super::*;
    use crate::error::UnknownEncoding;

    #[test]
    fn key_to_parts_decodes_spaces() {
        let codec = KeyCodec::new("UTF-8");
        let parts = codec
            .key_to_parts("/bucket/folder%20with%20spaces/file")
            .unwrap();
        assert_eq!(parts, vec!["", "bucket", "folder with spaces", "file"]);
    }

    #[test]
    fn relative_key_has_no_root_marker() {
        let codec = KeyCodec::default();
        let parts = codec.key_to_parts("bucket/file").unwrap();
        assert_eq!(parts, vec!["bucket", "file"]);
    }

    #[test]
    fn parts_to_key_keeps_separator_in_parts() {
        let codec = KeyCodec::default();
        let key = codec
            .parts_to_key(&["/bucket", "folder with spaces", "file"])
            .unwrap();
        assert_eq!(key, "/bucket/folder%20with%20spaces/file");
    }

    #[test]
    fn parts_to_key_of_nothing_is_empty() {
        let codec = KeyCodec::default();
        let parts: [&str; 0] = [];
        assert_eq!(codec.parts_to_key(&parts).unwrap(), "");
    }

    #[test]
    fn unknown_encoding_fails_key_to_parts_with_lookup_source() {
        let codec = KeyCodec::new("unknown");
        let err = codec
            .key_to_parts("/bucket/folder%20with%20spaces/file")
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::UnsupportedEncoding(UnknownEncoding {
                label: "unknown".into()
            })
        );
        let source = err
            .source()
            .and_then(|s| s.downcast_ref::<UnknownEncoding>())
            .expect("lookup failure should be the source");
        assert_eq!(source.label, "unknown");
    }

    #[test]
    fn unknown_encoding_fails_parts_to_key() {
        let codec = KeyCodec::new("unknown");
        let err = codec.parts_to_key(&["/bucket", "file"]).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedEncoding(_)));
    }

    #[test]
    fn escapes_use_configured_encoding() {
        let utf8 = KeyCodec::new("UTF-8");
        let latin1 = KeyCodec::new("ISO-8859-1");
        assert_eq!(utf8.encode_segment("café").unwrap(), "caf%C3%A9");
        assert_eq!(latin1.encode_segment("café").unwrap(), "caf%E9");
        assert_eq!(latin1.decode_segment("caf%E9").unwrap(), "café");
        assert_eq!(utf8.decode_segment("caf%c3%a9").unwrap(), "café");
    }

    #[test]
    fn encode_segment_escapes_separator() {
        let codec = KeyCodec::default();
        assert_eq!(codec.encode_segment("a/b").unwrap(), "a%2Fb");
        assert_eq!(codec.decode_segment("a%2Fb").unwrap(), "a/b");
    }

    #[test]
    fn unmappable_character_is_reported() {
        let codec = KeyCodec::new("US-ASCII");
        let err = codec.parts_to_key(&["naïve"]).unwrap_err();
        assert!(matches!(err, CodecError::Unmappable { ch: 'ï', .. }));
    }

    #[test]
    fn malformed_escapes_are_rejected() {
        let codec = KeyCodec::default();
        for bad in ["%", "%2", "%G0", "abc%2"] {
            let err = codec.decode_segment(bad).unwrap_err();
            assert!(
                matches!(err, CodecError::MalformedEscape { .. }),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn invalid_utf8_bytes_are_rejected() {
        let codec = KeyCodec::default();
        let err = codec.decode_segment("%E9").unwrap_err();
        assert!(matches!(err, CodecError::InvalidBytes { encoding: "UTF-8", .. }));
    }

    #[test]
    fn literal_non_ascii_is_preserved() {
        let codec = KeyCodec::default();
        assert_eq!(codec.decode_segment("日本").unwrap(), "日本");
    }

    #[test]
    fn userinfo_escapes_authority_delimiters() {
        assert_eq!(escape_userinfo("a:b"), "a%3Ab");
        assert_eq!(escape_userinfo("user@corp/x%"), "user%40corp%2Fx%25");
        assert_eq!(escape_userinfo("accessKey"), "accessKey");
        assert_eq!(escape_userinfo("clé"), "cl%C3%A9");
        assert_eq!(unescape_userinfo("cl%C3%A9").unwrap(), "clé");
        assert_eq!(unescape_userinfo("access%20key").unwrap(), "access key");
        assert!(unescape_userinfo("bad%2").is_err());
    }

    fn segment() -> impl Strategy<Value = String> {
        "[^/]{1,12}"
    }

    proptest! {
        #[test]
        fn parts_roundtrip_through_key(parts in prop::collection::vec(segment(), 1..6)) {
            let codec = KeyCodec::default();
            let key = codec.parts_to_key(&parts).unwrap();
            prop_assert_eq!(codec.key_to_parts(&key).unwrap(), parts);
        }

        #[test]
        fn userinfo_roundtrips(key in "[a-zA-Z0-9 :@/%+é]{0,12}") {
            prop_assert_eq!(unescape_userinfo(&escape_userinfo(&key)).unwrap(), key);
        }

        #[test]
        fn latin1_parts_roundtrip(parts in prop::collection::vec("[a-zA-Z0-9 %+àéîõüÿ]{1,8}", 1..5)) {
            let codec = KeyCodec::new("latin1");
            let key = codec.parts_to_key(&parts).unwrap();
            prop_assert_eq!(codec.key_to_parts(&key).unwrap(), parts);
        }

        #[test]
        fn canonical_keys_roundtrip(parts in prop::collection::vec(segment(), 1..6)) {
            let codec = KeyCodec::default();
            let key = codec.parts_to_key(&parts).unwrap();
            let reparsed = codec.key_to_parts(&key).unwrap();
            prop_assert_eq!(codec.parts_to_key(&reparsed).unwrap(), key);
        }
    }
}
