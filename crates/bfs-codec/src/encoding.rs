use std::fmt;
use std::str::FromStr;

use crate::error::{CodecError, CodecResult, UnknownEncoding};

/// Text encodings understood by the key codec.
///
/// The encoding decides which bytes a non-ASCII character becomes when it is
/// percent-escaped, and how escaped bytes are turned back into text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    #[default]
    Utf8,
    UsAscii,
    Iso8859_1,
}

impl TextEncoding {
    /// Resolve an encoding from a label such as `"UTF-8"` or `"latin1"`.
    ///
    /// Matching is ASCII case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use bfs_codec::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::for_label("utf8").unwrap(), TextEncoding::Utf8);
    /// assert_eq!(TextEncoding::for_label("Latin1").unwrap(), TextEncoding::Iso8859_1);
    /// assert!(TextEncoding::for_label("unknown").is_err());
    /// ```
    pub fn for_label(label: &str) -> Result<Self, UnknownEncoding> {
        let label = label.trim();
        [Self::Utf8, Self::UsAscii, Self::Iso8859_1]
            .into_iter()
            .find(|enc| enc.labels().iter().any(|l| l.eq_ignore_ascii_case(label)))
            .ok_or_else(|| UnknownEncoding {
                label: label.to_string(),
            })
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.labels()[0]
    }

    fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Utf8 => &["UTF-8", "utf8"],
            Self::UsAscii => &["US-ASCII", "ascii", "iso646-us"],
            Self::Iso8859_1 => &["ISO-8859-1", "iso8859-1", "iso_8859-1", "latin1", "l1"],
        }
    }

    /// Append the bytes of `ch` in this encoding to `out`.
    pub fn encode_char(&self, ch: char, out: &mut Vec<u8>) -> CodecResult<()> {
        match self {
            Self::Utf8 => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            Self::UsAscii if ch.is_ascii() => out.push(ch as u8),
            Self::Iso8859_1 if (ch as u32) <= 0xFF => out.push(ch as u32 as u8),
            _ => {
                return Err(CodecError::Unmappable {
                    ch,
                    encoding: self.name(),
                })
            }
        }
        Ok(())
    }

    /// Decode `bytes` into text. Returns `None` if the bytes are invalid.
    pub fn decode(&self, bytes: Vec<u8>) -> Option<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes).ok(),
            Self::UsAscii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| b as char).collect()),
            Self::Iso8859_1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(TextEncoding::for_label("UTF-8").unwrap(), TextEncoding::Utf8);
        assert_eq!(TextEncoding::for_label("utf-8").unwrap(), TextEncoding::Utf8);
        assert_eq!(TextEncoding::for_label("US-ascii").unwrap(), TextEncoding::UsAscii);
        assert_eq!(
            TextEncoding::for_label("iso-8859-1").unwrap(),
            TextEncoding::Iso8859_1
        );
    }

    #[test]
    fn unknown_label_reports_label() {
        let err = TextEncoding::for_label("unknown").unwrap_err();
        assert_eq!(err.label, "unknown");
    }

    #[test]
    fn from_str_and_display_agree() {
        let enc: TextEncoding = "latin1".parse().unwrap();
        assert_eq!(enc.to_string(), "ISO-8859-1");
        assert_eq!(TextEncoding::default().to_string(), "UTF-8");
    }

    #[test]
    fn utf8_encodes_multibyte() {
        let mut out = Vec::new();
        TextEncoding::Utf8.encode_char('é', &mut out).unwrap();
        assert_eq!(out, vec![0xC3, 0xA9]);
    }

    #[test]
    fn latin1_encodes_single_byte() {
        let mut out = Vec::new();
        TextEncoding::Iso8859_1.encode_char('é', &mut out).unwrap();
        assert_eq!(out, vec![0xE9]);
        assert!(TextEncoding::Iso8859_1.encode_char('€', &mut out).is_err());
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        let mut out = Vec::new();
        let err = TextEncoding::UsAscii.encode_char('é', &mut out).unwrap_err();
        assert!(matches!(err, CodecError::Unmappable { ch: 'é', .. }));
        assert!(TextEncoding::UsAscii.decode(vec![0xE9]).is_none());
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        assert!(TextEncoding::Utf8.decode(vec![0xE9]).is_none());
        assert_eq!(TextEncoding::Iso8859_1.decode(vec![0xE9]).unwrap(), "é");
    }
}
