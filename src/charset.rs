use std::borrow::Cow;
use zerocopy::byteorder::{BE, LE, U16};
use zerocopy::IntoBytes;

use crate::writer::WriterError;

/// Character encoding used when a string is written without an explicit charset.
pub const DEFAULT_CHARSET: Charset = Charset::Ascii;

/// Character encodings supported by the string writes of [`crate::DataWriter`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub enum Charset {
    /// 7-bit US-ASCII, one byte per character.
    #[default]
    Ascii,
    /// ISO-8859-1, one byte per character, covering U+0000 to U+00FF.
    Latin1,
    /// UTF-8.
    Utf8,
    /// UTF-16, big-endian code units, no byte order mark.
    Utf16Be,
    /// UTF-16, little-endian code units, no byte order mark.
    Utf16Le,
}

impl Charset {
    /// Returns a short, conventional name for the charset.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascii => "US-ASCII",
            Self::Latin1 => "ISO-8859-1",
            Self::Utf8 => "UTF-8",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
        }
    }

    /// Encodes `s` in this charset.
    ///
    /// Fails with [`WriterError::Unencodable`] if `s` contains a character outside the range of
    /// the charset. Characters are never replaced.
    pub fn encode(self, s: &str) -> Result<Cow<'_, [u8]>, WriterError> {
        match self {
            Self::Ascii => match s.chars().find(|c| !c.is_ascii()) {
                Some(ch) => Err(WriterError::Unencodable { charset: self, ch }),
                None => Ok(Cow::Borrowed(s.as_bytes())),
            },
            Self::Latin1 => {
                if s.is_ascii() {
                    return Ok(Cow::Borrowed(s.as_bytes()));
                }
                let mut out = Vec::with_capacity(s.len());
                for ch in s.chars() {
                    let Ok(b) = u8::try_from(u32::from(ch)) else {
                        return Err(WriterError::Unencodable { charset: self, ch });
                    };
                    out.push(b);
                }
                Ok(Cow::Owned(out))
            }
            Self::Utf8 => Ok(Cow::Borrowed(s.as_bytes())),
            Self::Utf16Be => {
                let units: Vec<U16<BE>> = s.encode_utf16().map(U16::<BE>::new).collect();
                Ok(Cow::Owned(units.as_bytes().to_vec()))
            }
            Self::Utf16Le => {
                let units: Vec<U16<LE>> = s.encode_utf16().map(U16::<LE>::new).collect();
                Ok(Cow::Owned(units.as_bytes().to_vec()))
            }
        }
    }
}

impl core::fmt::Display for Charset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
