//! Accumulator for the four hex digits of a `\uXXXX` escape.
//!
//! The [`UnicodeEscapeBuffer`] type folds ASCII hexadecimal digits (`0-9`,
//! `A-F`, `a-f`) into a UTF-16 code unit as they arrive and hands the unit back
//! when the fourth digit is fed, then resets itself for the next escape.
//!
//! Code units are returned as-is; pairing surrogates is up to the caller.
//!
//! # Errors
//!
//! Feeding a byte that is not a hex digit returns
//! [`LexicalError::InvalidHexEscape`]. The scanner has already validated
//! escapes, so this only fires on inputs that bypass it.

use super::error::LexicalError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u32,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clears any accumulated digits.
    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u32> {
        match b {
            b'0'..=b'9' => Some(u32::from(b - b'0')),
            b'a'..=b'f' => Some(u32::from(b - b'a') + 10),
            b'A'..=b'F' => Some(u32::from(b - b'A') + 10),
            _ => None,
        }
    }

    /// Feeds one hex digit.
    ///
    /// - Returns `Ok(None)` while fewer than four digits have been seen.
    /// - Returns `Ok(Some(unit))` on the fourth digit and resets.
    /// - Returns `Err` if `b` is not a hex digit; the buffer is reset.
    pub(crate) fn feed(&mut self, b: u8) -> Result<Option<u32>, LexicalError> {
        let Some(d) = Self::hex_val(b) else {
            self.reset();
            return Err(LexicalError::InvalidHexEscape(b));
        };

        self.acc = (self.acc << 4) | d;
        self.len += 1;

        if self.len < 4 {
            return Ok(None);
        }

        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}
