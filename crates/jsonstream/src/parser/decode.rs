//! Decode buffer for strings that contain escape sequences.
//!
//! The scanner hands over the raw bytes between the quotes; this buffer
//! rewrites them with every escape resolved. The result lives in the buffer's
//! own allocation and never points into chunk memory. The buffer is cleared
//! at the start of every decode, so one allocation serves the whole stream.
//!
//! Escaped UTF-16 surrogate pairs combine into one scalar value. A lone
//! surrogate cannot be represented as UTF-8 and is an
//! [`EncodingError::UnpairedSurrogate`].
use bstr::ByteSlice;

use super::{
    error::{EncodingError, ErrorSource, LexicalError},
    escape_buffer::UnicodeEscapeBuffer,
};

#[derive(Debug)]
pub(crate) struct DecodeBuffer {
    buf: Vec<u8>,
    escape: UnicodeEscapeBuffer,
}

impl DecodeBuffer {
    pub(crate) fn new() -> Self {
        Self {
            buf: Vec::new(),
            escape: UnicodeEscapeBuffer::new(),
        }
    }

    /// Resolves the escapes in `raw` and returns the decoded bytes.
    pub(crate) fn decode(&mut self, raw: &[u8]) -> Result<&[u8], ErrorSource> {
        self.buf.clear();
        self.buf.reserve(raw.len());
        self.escape.reset();

        let mut high: Option<u32> = None;
        let mut rest = raw;
        while let Some(i) = rest.find_byte(b'\\') {
            if i > 0 {
                if let Some(unit) = high {
                    return Err(EncodingError::UnpairedSurrogate(unit).into());
                }
                self.buf.extend_from_slice(&rest[..i]);
            }

            let Some(&kind) = rest.get(i + 1) else {
                return Err(LexicalError::InvalidEscape(b'\\').into());
            };
            let simple = match kind {
                b'"' => Some(b'"'),
                b'\\' => Some(b'\\'),
                b'/' => Some(b'/'),
                b'b' => Some(0x08),
                b'f' => Some(0x0c),
                b'n' => Some(b'\n'),
                b'r' => Some(b'\r'),
                b't' => Some(b'\t'),
                b'u' => None,
                other => return Err(LexicalError::InvalidEscape(other).into()),
            };

            if let Some(byte) = simple {
                if let Some(unit) = high {
                    return Err(EncodingError::UnpairedSurrogate(unit).into());
                }
                self.buf.push(byte);
                rest = &rest[i + 2..];
                continue;
            }

            let Some(digits) = rest.get(i + 2..i + 6) else {
                return Err(LexicalError::InvalidEscape(b'u').into());
            };
            let mut unit = None;
            for &digit in digits {
                unit = self.escape.feed(digit)?;
            }
            let Some(unit) = unit else {
                return Err(LexicalError::InvalidEscape(b'u').into());
            };
            high = self.push_code_unit(unit, high)?;
            rest = &rest[i + 6..];
        }

        if !rest.is_empty() {
            if let Some(unit) = high {
                return Err(EncodingError::UnpairedSurrogate(unit).into());
            }
            self.buf.extend_from_slice(rest);
        }
        if let Some(unit) = high {
            return Err(EncodingError::UnpairedSurrogate(unit).into());
        }
        Ok(&self.buf)
    }

    /// Appends one UTF-16 code unit, returning the high surrogate that is now
    /// waiting for its partner, if any.
    fn push_code_unit(&mut self, unit: u32, high: Option<u32>) -> Result<Option<u32>, EncodingError> {
        let scalar = match (high, unit) {
            (None, 0xD800..=0xDBFF) => return Ok(Some(unit)),
            (None, 0xDC00..=0xDFFF) => return Err(EncodingError::UnpairedSurrogate(unit)),
            (None, _) => unit,
            (Some(high), 0xDC00..=0xDFFF) => 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00),
            (Some(high), _) => return Err(EncodingError::UnpairedSurrogate(high)),
        };
        let ch = char::from_u32(scalar).ok_or(EncodingError::UnpairedSurrogate(scalar))?;
        let mut tmp = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut tmp).as_bytes());
        Ok(None)
    }
}
