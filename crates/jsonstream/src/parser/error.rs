use std::{io, num::ParseFloatError, num::ParseIntError};

use thiserror::Error;

use super::tokens::TokenKind;

/// The error produced when a JSON stream cannot be turned into events.
///
/// Every error is fatal: once an [`Events`](crate::Events) iterator yields an
/// error it yields nothing further.
#[derive(Error, Debug)]
#[error("{source} at byte {offset}")]
pub struct ParserError {
    pub(crate) source: ErrorSource,
    pub(crate) offset: usize,
}

impl ParserError {
    pub(crate) fn new(source: impl Into<ErrorSource>, offset: usize) -> Self {
        Self {
            source: source.into(),
            offset,
        }
    }

    /// Absolute byte offset in the input where the error was detected.
    ///
    /// For grammar and value errors this is the start of the offending token;
    /// for lexical errors and premature end of input it is the scanner
    /// position.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The underlying cause.
    #[must_use]
    pub fn source_kind(&self) -> &ErrorSource {
        &self.source
    }

    /// Returns `true` if the input was not well-formed JSON text, as opposed
    /// to an I/O failure or an unconvertible scalar.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self.source, ErrorSource::Syntax(_))
    }
}

/// Why parsing stopped.
#[derive(Error, Debug)]
pub enum ErrorSource {
    /// Reading from the source failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The input is not well-formed JSON text.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// A string is not valid Unicode.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    /// A number span does not parse.
    #[error("numeric conversion error: {0}")]
    NumericConversion(#[from] NumericError),
}

/// The input is not well-formed JSON text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The scanner rejected a byte sequence.
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    /// Tokens are out of order.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    /// The input ended inside a token or an open container.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// The scanner rejected the byte sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexicalError {
    /// A byte that cannot start a token.
    #[error("invalid character '{}'", escape_byte(.0))]
    InvalidCharacter(u8),
    /// A `true`, `false` or `null` that is cut short or misspelled.
    #[error("invalid literal")]
    InvalidLiteral,
    /// A `-` not followed by a digit.
    #[error("missing integer after minus sign")]
    MissingIntegerAfterMinus,
    /// A `.` not followed by a digit.
    #[error("missing integer after decimal point")]
    MissingIntegerAfterDecimal,
    /// An `e`/`E` (and optional sign) not followed by a digit.
    #[error("missing integer after exponent")]
    MissingIntegerAfterExponent,
    /// A backslash followed by a byte that is not an escape.
    #[error("invalid escape character '{}' in string", escape_byte(.0))]
    InvalidEscape(u8),
    /// A non-hex byte inside `\uXXXX`.
    #[error("invalid hex digit '{}' in unicode escape", escape_byte(.0))]
    InvalidHexEscape(u8),
    /// A raw byte below `0x20` inside a string.
    #[error("unescaped control character 0x{0:02x} in string")]
    ControlCharacter(u8),
    /// A `/` outside a string while comments are disabled.
    #[error("comments are not enabled")]
    CommentsNotAllowed,
    /// A `/` not followed by `/` or `*`.
    #[error("invalid comment")]
    InvalidComment,
}

/// Tokens appeared in an order JSON's container grammar does not allow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Two members without a `,` between them, or a `,` where a value or
    /// key was expected.
    #[error("missing comma")]
    MissingComma,
    /// A key not followed by `:`, or a `:` where a value or key was expected.
    #[error("missing colon")]
    MissingColon,
    /// A closing `}` or `]` where a value or key was expected.
    #[error("unexpected {0}")]
    UnexpectedToken(TokenKind),
    /// An array or object in key position.
    #[error("object keys must be scalars")]
    NonScalarKey,
    /// A token after a complete root value, with multiple values disabled.
    #[error("trailing content after the root value")]
    TrailingContent,
}

/// A string cannot be represented as UTF-8 text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The decoded string bytes are not UTF-8.
    #[error("invalid UTF-8 in string after {valid_up_to} valid bytes")]
    InvalidUtf8 {
        /// Length of the longest valid prefix.
        valid_up_to: usize,
    },
    /// A `\uXXXX` escape naming half of a surrogate pair without the other.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u32),
}

/// A number span does not parse.
///
/// Integers too wide for `i64` are not an error; they are reported as
/// doubles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumericError {
    /// An integer span that `i64` parsing rejects for a reason other than
    /// range.
    #[error("invalid integer: {0}")]
    Integer(#[from] ParseIntError),
    /// A span that `f64` parsing rejects.
    #[error("invalid double: {0}")]
    Double(#[from] ParseFloatError),
}

fn escape_byte(b: &u8) -> core::ascii::EscapeDefault {
    b.escape_ascii()
}

impl From<LexicalError> for ErrorSource {
    fn from(err: LexicalError) -> Self {
        ErrorSource::Syntax(err.into())
    }
}

impl From<GrammarError> for ErrorSource {
    fn from(err: GrammarError) -> Self {
        ErrorSource::Syntax(err.into())
    }
}
