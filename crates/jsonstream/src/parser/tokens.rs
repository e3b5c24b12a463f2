//! Token stream: chunks in, decoded tokens out.
//!
//! [`TokenStream`] owns the chunk reader, the scanner and the decode buffer.
//! It pulls a chunk only when the scanner runs out of bytes, drops comments,
//! resolves string escapes and tags every token with its absolute byte offset.
//! Tokens borrow the stream, so each one must be consumed before the next is
//! requested.
use core::fmt;
use std::{io::BufRead, num::IntErrorKind};

use bstr::ByteSlice;

use super::{
    chunks::ChunkReader,
    decode::DecodeBuffer,
    error::{EncodingError, ErrorSource, GrammarError, NumericError, ParserError},
    options::ParserOptions,
    scanner::{Lexed, Lexeme, Scanner, Span},
};
use crate::event::Scalar;

/// The kind of a decoded token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `true` or `false`
    Bool,
    /// A number without fraction or exponent.
    Integer,
    /// A number with a fraction or an exponent.
    Double,
    /// A string; the payload is already unescaped.
    String,
    /// `null`
    Null,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
}

impl TokenKind {
    /// Returns `true` for the kinds that carry a scalar value.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::Bool
                | TokenKind::Integer
                | TokenKind::Double
                | TokenKind::String
                | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Bool => "boolean",
            TokenKind::Integer => "integer",
            TokenKind::Double => "double",
            TokenKind::String => "string",
            TokenKind::Null => "null",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
        })
    }
}

/// One token, borrowed from the [`TokenStream`] that produced it.
///
/// The payload is the raw text of booleans and numbers, the decoded bytes of
/// strings (not yet checked for UTF-8) and empty for `null` and punctuation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    kind: TokenKind,
    text: &'a [u8],
    offset: usize,
}

impl<'a> Token<'a> {
    /// What the token is.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The payload bytes.
    #[must_use]
    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    /// Absolute byte offset of the token's first byte.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Converts the payload into a typed scalar.
    ///
    /// # Errors
    ///
    /// - [`EncodingError::InvalidUtf8`] if a string payload is not UTF-8.
    /// - [`NumericError`] if a number span does not parse. Integers outside
    ///   the `i64` range become [`Scalar::Double`].
    /// - [`GrammarError::MissingComma`] or [`GrammarError::MissingColon`] for a
    ///   stray `,` or `:`, and [`GrammarError::UnexpectedToken`] for closers.
    pub fn to_scalar(&self) -> Result<Scalar, ParserError> {
        let fail = |source: ErrorSource| ParserError::new(source, self.offset);
        match self.kind {
            TokenKind::Null => Ok(Scalar::Null),
            TokenKind::Bool => Ok(Scalar::Bool(self.text == b"true")),
            TokenKind::Integer => {
                let text = self.utf8().map_err(&fail)?;
                match text.parse::<i64>() {
                    Ok(n) => Ok(Scalar::Integer(n)),
                    // Well-formed but wider than i64.
                    Err(err)
                        if matches!(
                            err.kind(),
                            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                        ) =>
                    {
                        text.parse::<f64>()
                            .map(Scalar::Double)
                            .map_err(|err| fail(NumericError::from(err).into()))
                    }
                    Err(err) => Err(fail(NumericError::from(err).into())),
                }
            }
            TokenKind::Double => {
                let n = self
                    .utf8()
                    .map_err(&fail)?
                    .parse::<f64>()
                    .map_err(|err| fail(NumericError::from(err).into()))?;
                Ok(Scalar::Double(n))
            }
            TokenKind::String => Ok(Scalar::String(self.utf8().map_err(fail)?.to_owned())),
            TokenKind::Comma => Err(fail(GrammarError::MissingComma.into())),
            TokenKind::Colon => Err(fail(GrammarError::MissingColon.into())),
            kind => Err(fail(GrammarError::UnexpectedToken(kind).into())),
        }
    }

    fn utf8(&self) -> Result<&'a str, ErrorSource> {
        self.text.to_str().map_err(|err| {
            EncodingError::InvalidUtf8 {
                valid_up_to: err.valid_up_to(),
            }
            .into()
        })
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("text", &self.text.as_bstr())
            .field("offset", &self.offset)
            .finish()
    }
}

/// Lazily turns a buffered byte source into [`Token`]s.
///
/// # Examples
///
/// ```
/// use jsonstream::{ParserOptions, TokenKind, TokenStream};
///
/// let mut tokens = TokenStream::new(&b"[1, \"a\\tb\"]"[..], &ParserOptions::default());
/// let mut kinds = Vec::new();
/// while let Some(token) = tokens.next_token().unwrap() {
///     if token.kind() == TokenKind::String {
///         assert_eq!(token.text(), b"a\tb");
///     }
///     kinds.push(token.kind());
/// }
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::LeftBracket,
///         TokenKind::Integer,
///         TokenKind::Comma,
///         TokenKind::String,
///         TokenKind::RightBracket,
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct TokenStream<R> {
    chunks: ChunkReader<R>,
    chunk: Vec<u8>,
    /// Index of the next unscanned byte in `chunk`.
    cursor: usize,
    /// Absolute offset of `chunk[0]`.
    base: usize,
    /// Absolute offset of the token being carried across chunks.
    carried_from: usize,
    scanner: Scanner,
    decode: DecodeBuffer,
    exhausted: bool,
}

impl<R: BufRead> TokenStream<R> {
    /// Creates a stream over `reader`. Only `allow_comments` and `chunk_size`
    /// apply at this layer.
    #[must_use]
    pub fn new(reader: R, options: &ParserOptions) -> Self {
        Self {
            chunks: ChunkReader::new(reader, options.effective_chunk_size()),
            chunk: Vec::new(),
            cursor: 0,
            base: 0,
            carried_from: 0,
            scanner: Scanner::new(options.allow_comments),
            decode: DecodeBuffer::new(),
            exhausted: false,
        }
    }

    /// Returns the next token, or `None` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// I/O failures, lexical errors, unterminated tokens at end of input and
    /// undecodable string escapes. After an error the stream is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token<'_>>, ParserError> {
        let (kind, escaped, span, offset) = loop {
            if self.exhausted {
                return Ok(None);
            }
            let lexed = match self.scanner.lex(&self.chunk, &mut self.cursor) {
                Ok(lexed) => lexed,
                Err(err) => {
                    self.exhausted = true;
                    return Err(ParserError::new(err, self.position()));
                }
            };
            match lexed {
                Lexed::EndOfBuffer { partial_from } => {
                    if let Some(at) = partial_from {
                        self.carried_from = self.base + at;
                    }
                    self.advance()?;
                }
                Lexed::Token {
                    lexeme,
                    span,
                    start,
                } => {
                    let Some(kind) = token_kind(lexeme) else {
                        continue;
                    };
                    let offset = start.map_or(self.carried_from, |at| self.base + at);
                    break (kind, lexeme == Lexeme::StringWithEscapes, span, offset);
                }
            }
        };

        let raw = match span {
            Span::Chunk(range) => &self.chunk[range],
            Span::Carried(range) => &self.scanner.carried()[range],
        };
        let text: &[u8] = match kind {
            TokenKind::String if escaped => match self.decode.decode(raw) {
                Ok(text) => text,
                Err(err) => {
                    self.exhausted = true;
                    return Err(ParserError::new(err, offset));
                }
            },
            TokenKind::String | TokenKind::Bool | TokenKind::Integer | TokenKind::Double => raw,
            _ => &[],
        };
        Ok(Some(Token { kind, text, offset }))
    }

    /// Absolute byte offset of the scanner.
    #[must_use]
    pub fn position(&self) -> usize {
        (self.base + self.cursor).min(self.chunks.bytes_read())
    }

    /// Adopts the next chunk, or finishes the scanner when there is none.
    fn advance(&mut self) -> Result<(), ParserError> {
        self.base += self.chunk.len();
        self.cursor = 0;
        match self.chunks.next_chunk(&mut self.chunk) {
            Ok(true) => {
                tracing::trace!(offset = self.base, len = self.chunk.len(), "adopted chunk");
                Ok(())
            }
            Ok(false) => {
                self.exhausted = true;
                self.scanner
                    .finish()
                    .map_err(|err| ParserError::new(err, self.position()))
            }
            Err(err) => {
                self.exhausted = true;
                Err(ParserError::new(err, self.position()))
            }
        }
    }
}

/// Maps a lexeme to the kind it is reported as; comments are not reported.
fn token_kind(lexeme: Lexeme) -> Option<TokenKind> {
    Some(match lexeme {
        Lexeme::Bool => TokenKind::Bool,
        Lexeme::Integer => TokenKind::Integer,
        Lexeme::Double => TokenKind::Double,
        Lexeme::String | Lexeme::StringWithEscapes => TokenKind::String,
        Lexeme::Null => TokenKind::Null,
        Lexeme::LeftBrace => TokenKind::LeftBrace,
        Lexeme::RightBrace => TokenKind::RightBrace,
        Lexeme::LeftBracket => TokenKind::LeftBracket,
        Lexeme::RightBracket => TokenKind::RightBracket,
        Lexeme::Comma => TokenKind::Comma,
        Lexeme::Colon => TokenKind::Colon,
        Lexeme::Comment => return None,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::parser::error::SyntaxError;

    fn kinds(input: &str, options: ParserOptions) -> Vec<(TokenKind, Vec<u8>, usize)> {
        let mut stream = TokenStream::new(input.as_bytes(), &options);
        let mut out = Vec::new();
        while let Some(token) = stream.next_token().unwrap() {
            out.push((token.kind(), token.text().to_vec(), token.offset()));
        }
        out
    }

    #[test]
    fn payloads_and_offsets() {
        let tokens = kinds(r#"{"k": [true, -1.5, null]}"#, ParserOptions::default());
        assert_eq!(
            tokens,
            vec![
                (TokenKind::LeftBrace, vec![], 0),
                (TokenKind::String, b"k".to_vec(), 1),
                (TokenKind::Colon, vec![], 4),
                (TokenKind::LeftBracket, vec![], 6),
                (TokenKind::Bool, b"true".to_vec(), 7),
                (TokenKind::Comma, vec![], 11),
                (TokenKind::Double, b"-1.5".to_vec(), 13),
                (TokenKind::Comma, vec![], 17),
                (TokenKind::Null, vec![], 19),
                (TokenKind::RightBracket, vec![], 23),
                (TokenKind::RightBrace, vec![], 24),
            ]
        );
    }

    #[test]
    fn offsets_survive_chunking() {
        let input = "[\"abcdef\",\n 12345, \"x\\ny\"]";
        let whole = kinds(input, ParserOptions::default());
        for chunk_size in 1..8 {
            let options = ParserOptions::default().with_chunk_size(chunk_size);
            assert_eq!(kinds(input, options), whole, "chunk size {chunk_size}");
        }
        assert_eq!(whole[3], (TokenKind::Integer, b"12345".to_vec(), 12));
        assert_eq!(whole[5], (TokenKind::String, b"x\ny".to_vec(), 19));
    }

    #[test]
    fn comments_are_skipped() {
        let options = ParserOptions {
            allow_comments: true,
            ..ParserOptions::default()
        };
        let tokens = kinds("// a\n[ /* b */ 1 ] // c", options);
        let found: Vec<_> = tokens.iter().map(|t| t.0).collect();
        assert_eq!(
            found,
            [
                TokenKind::LeftBracket,
                TokenKind::Integer,
                TokenKind::RightBracket
            ]
        );
    }

    #[test]
    fn trailing_number_is_terminated() {
        let tokens = kinds("42", ParserOptions::default());
        assert_eq!(tokens, vec![(TokenKind::Integer, b"42".to_vec(), 0)]);
    }

    #[rstest]
    #[case("[1, @]", 4)]
    #[case("\n\n  tru", 7)]
    #[case("\"abc", 4)]
    fn error_offsets(#[case] input: &str, #[case] offset: usize) {
        let mut stream = TokenStream::new(input.as_bytes(), &ParserOptions::default());
        let err = loop {
            match stream.next_token() {
                Ok(Some(_)) => {}
                Ok(None) => panic!("expected an error"),
                Err(err) => break err,
            }
        };
        assert_eq!(err.offset(), offset);
        assert!(err.is_syntax());
        assert!(stream.next_token().unwrap().is_none());
    }

    #[test]
    fn unterminated_string_is_end_of_input() {
        let mut stream = TokenStream::new(&b"\"abc"[..], &ParserOptions::default());
        let err = stream.next_token().unwrap_err();
        assert!(matches!(
            err.source_kind(),
            ErrorSource::Syntax(SyntaxError::UnexpectedEndOfInput)
        ));
    }

    #[test]
    fn to_scalar_dispatches_on_kind() {
        fn token(kind: TokenKind, text: &[u8]) -> Token<'_> {
            Token {
                kind,
                text,
                offset: 3,
            }
        }
        assert_eq!(
            token(TokenKind::Bool, b"false").to_scalar().unwrap(),
            Scalar::Bool(false)
        );
        assert_eq!(
            token(TokenKind::Integer, b"-17").to_scalar().unwrap(),
            Scalar::Integer(-17)
        );
        assert_eq!(
            token(TokenKind::Double, b"2.5e1").to_scalar().unwrap(),
            Scalar::Double(25.0)
        );
        assert_eq!(
            token(TokenKind::String, "\u{e9}".as_bytes())
                .to_scalar()
                .unwrap(),
            Scalar::String("\u{e9}".to_owned())
        );

        assert_eq!(
            token(TokenKind::Integer, b"18446744073709551615")
                .to_scalar()
                .unwrap(),
            Scalar::Double(2f64.powi(64))
        );

        let err = token(TokenKind::Integer, b"1x").to_scalar().unwrap_err();
        assert!(matches!(
            err.source_kind(),
            ErrorSource::NumericConversion(NumericError::Integer(_))
        ));
        assert_eq!(err.offset(), 3);

        let err = token(TokenKind::String, b"a\xffb").to_scalar().unwrap_err();
        assert!(matches!(
            err.source_kind(),
            ErrorSource::Encoding(EncodingError::InvalidUtf8 { valid_up_to: 1 })
        ));

        let err = token(TokenKind::Colon, b"").to_scalar().unwrap_err();
        assert_eq!(err.to_string(), "syntax error: missing colon at byte 3");
        let err = token(TokenKind::RightBrace, b"").to_scalar().unwrap_err();
        assert_eq!(err.to_string(), "syntax error: unexpected '}' at byte 3");
    }
}
