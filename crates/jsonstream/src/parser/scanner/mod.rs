//! Scanner: byte buffer in, one lexical token out.
//!
//! What it does
//! - Given a chunk and a cursor into it, skips JSON whitespace and recognizes
//!   the next token: punctuation, a literal, a number, a string (plain or with
//!   escapes) or a comment.
//! - Reports the token as a [`Span`] rather than a slice, so the caller can
//!   decide when to borrow the bytes.
//! - Returns [`Lexed::EndOfBuffer`] when the chunk holds no further complete
//!   token. A token cut off by the end of the chunk is copied into the carry
//!   and completed on the next call, with the next chunk.
//!
//! Carry
//! - The carry holds only the bytes of one unfinished token, starting at its
//!   first byte. Strings and comments record where scanning stopped
//!   ([`Resume`]) so that a long token split into many small chunks is scanned
//!   once, not once per chunk.
//! - When a carried token completes, its bytes move to a second buffer that
//!   backs [`Span::Carried`] until the next carried token completes.
//!
//! Scope
//! - No grammar, no escape decoding, no UTF-8 validation. String payloads are
//!   raw bytes between the quotes; the token stream decodes them.
//! - Numbers are only complete once a byte that cannot extend them is seen, so
//!   a number at the very end of input needs a trailing delimiter. The chunk
//!   reader appends one.
use core::{mem, ops::Range};

use bstr::ByteSlice;

use super::error::{LexicalError, SyntaxError};

/// The kind of a lexical token, before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme {
    Bool,
    Integer,
    Double,
    String,
    StringWithEscapes,
    Null,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Comment,
}

/// Location of a token payload. String payloads exclude the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Span {
    /// Range into the chunk passed to [`Scanner::lex`].
    Chunk(Range<usize>),
    /// Range into [`Scanner::carried`].
    Carried(Range<usize>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lexed {
    Token {
        lexeme: Lexeme,
        span: Span,
        /// Index of the token's first byte in the chunk, `None` if the token
        /// began in an earlier chunk.
        start: Option<usize>,
    },
    EndOfBuffer {
        /// Index in the chunk where a token began that is now carried.
        partial_from: Option<usize>,
    },
}

/// Where to pick up scanning a carried token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Resume {
    #[default]
    Restart,
    String {
        at: usize,
        escaped: bool,
    },
    LineComment {
        at: usize,
    },
    BlockComment {
        at: usize,
    },
}

#[derive(Debug)]
enum Scan {
    Complete(Lexeme, usize),
    Incomplete(Resume),
    Invalid(LexicalError, usize),
}

enum Escape {
    Valid(usize),
    Partial,
    Invalid(LexicalError, usize),
}

/// Bytes that end the fast path inside a string: the closing quote, the
/// escape introducer and every control character.
const STRING_SPECIAL: [u8; 34] = {
    let mut set = [0u8; 34];
    set[0] = b'"';
    set[1] = b'\\';
    let mut b: u8 = 0;
    while b < 0x20 {
        set[b as usize + 2] = b;
        b += 1;
    }
    set
};

#[derive(Debug, Default)]
pub(crate) struct Scanner {
    allow_comments: bool,
    carry: Vec<u8>,
    resume: Resume,
    completed: Vec<u8>,
}

impl Scanner {
    pub(crate) fn new(allow_comments: bool) -> Self {
        Self {
            allow_comments,
            ..Self::default()
        }
    }

    /// Scans the next token of `chunk` starting at `*cursor`.
    ///
    /// On success `*cursor` is advanced past the token (or to the end of the
    /// chunk). On error it points at the offending byte.
    pub(crate) fn lex(&mut self, chunk: &[u8], cursor: &mut usize) -> Result<Lexed, LexicalError> {
        if !self.carry.is_empty() {
            return self.lex_carried(chunk, cursor);
        }

        let Some(start) = skip_whitespace(chunk, *cursor) else {
            *cursor = chunk.len();
            return Ok(Lexed::EndOfBuffer { partial_from: None });
        };

        match scan(&chunk[start..], Resume::Restart, self.allow_comments) {
            Scan::Complete(lexeme, len) => {
                *cursor = start + len;
                Ok(Lexed::Token {
                    lexeme,
                    span: Span::Chunk(payload(lexeme, start, start + len)),
                    start: Some(start),
                })
            }
            Scan::Incomplete(resume) => {
                self.carry.extend_from_slice(&chunk[start..]);
                self.resume = resume;
                *cursor = chunk.len();
                Ok(Lexed::EndOfBuffer {
                    partial_from: Some(start),
                })
            }
            Scan::Invalid(err, at) => {
                *cursor = start + at;
                Err(err)
            }
        }
    }

    fn lex_carried(&mut self, chunk: &[u8], cursor: &mut usize) -> Result<Lexed, LexicalError> {
        let prev = self.carry.len();
        self.carry.extend_from_slice(&chunk[*cursor..]);

        match scan(&self.carry, self.resume, self.allow_comments) {
            Scan::Complete(lexeme, len) => {
                *cursor += len - prev;
                mem::swap(&mut self.carry, &mut self.completed);
                self.carry.clear();
                self.completed.truncate(len);
                self.resume = Resume::Restart;
                Ok(Lexed::Token {
                    lexeme,
                    span: Span::Carried(payload(lexeme, 0, len)),
                    start: None,
                })
            }
            Scan::Incomplete(resume) => {
                tracing::trace!(carried = self.carry.len(), "token continues past chunk");
                self.resume = resume;
                *cursor = chunk.len();
                Ok(Lexed::EndOfBuffer { partial_from: None })
            }
            Scan::Invalid(err, at) => {
                *cursor += at.saturating_sub(prev);
                self.carry.clear();
                self.resume = Resume::Restart;
                Err(err)
            }
        }
    }

    /// Bytes of the most recent token that completed from the carry.
    pub(crate) fn carried(&self) -> &[u8] {
        &self.completed
    }

    /// Signals end of input. A pending line comment is dropped; any other
    /// unfinished token is an error.
    pub(crate) fn finish(&mut self) -> Result<(), SyntaxError> {
        let pending = !self.carry.is_empty() && !matches!(self.resume, Resume::LineComment { .. });
        self.carry.clear();
        self.resume = Resume::Restart;
        if pending {
            Err(SyntaxError::UnexpectedEndOfInput)
        } else {
            Ok(())
        }
    }
}

fn skip_whitespace(chunk: &[u8], from: usize) -> Option<usize> {
    chunk[from..]
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .map(|pos| from + pos)
}

fn payload(lexeme: Lexeme, start: usize, end: usize) -> Range<usize> {
    match lexeme {
        Lexeme::String | Lexeme::StringWithEscapes => start + 1..end - 1,
        _ => start..end,
    }
}

/// Scans one token at the start of `input`.
fn scan(input: &[u8], resume: Resume, allow_comments: bool) -> Scan {
    match resume {
        Resume::String { at, escaped } => return scan_string(input, at, escaped),
        Resume::LineComment { at } => return scan_line_comment(input, at),
        Resume::BlockComment { at } => return scan_block_comment(input, at),
        Resume::Restart => {}
    }

    let Some(&first) = input.first() else {
        return Scan::Incomplete(Resume::Restart);
    };
    match first {
        b'{' => Scan::Complete(Lexeme::LeftBrace, 1),
        b'}' => Scan::Complete(Lexeme::RightBrace, 1),
        b'[' => Scan::Complete(Lexeme::LeftBracket, 1),
        b']' => Scan::Complete(Lexeme::RightBracket, 1),
        b',' => Scan::Complete(Lexeme::Comma, 1),
        b':' => Scan::Complete(Lexeme::Colon, 1),
        b'"' => scan_string(input, 1, false),
        b't' => scan_literal(input, b"true", Lexeme::Bool),
        b'f' => scan_literal(input, b"false", Lexeme::Bool),
        b'n' => scan_literal(input, b"null", Lexeme::Null),
        b'-' | b'0'..=b'9' => scan_number(input),
        b'/' if !allow_comments => Scan::Invalid(LexicalError::CommentsNotAllowed, 0),
        b'/' => match input.get(1) {
            None => Scan::Incomplete(Resume::Restart),
            Some(b'/') => scan_line_comment(input, 2),
            Some(b'*') => scan_block_comment(input, 2),
            Some(_) => Scan::Invalid(LexicalError::InvalidComment, 1),
        },
        other => Scan::Invalid(LexicalError::InvalidCharacter(other), 0),
    }
}

fn scan_literal(input: &[u8], literal: &'static [u8], lexeme: Lexeme) -> Scan {
    for (i, &expected) in literal.iter().enumerate() {
        match input.get(i) {
            None => return Scan::Incomplete(Resume::Restart),
            Some(&b) if b != expected => return Scan::Invalid(LexicalError::InvalidLiteral, i),
            Some(_) => {}
        }
    }
    Scan::Complete(lexeme, literal.len())
}

fn scan_number(input: &[u8]) -> Scan {
    let digits_from = |i: usize| i + input[i..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut lexeme = Lexeme::Integer;
    let mut i = usize::from(input[0] == b'-');
    match input.get(i) {
        None => return Scan::Incomplete(Resume::Restart),
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => i = digits_from(i),
        Some(_) => return Scan::Invalid(LexicalError::MissingIntegerAfterMinus, i),
    }

    if input.get(i) == Some(&b'.') {
        lexeme = Lexeme::Double;
        i += 1;
        match input.get(i) {
            None => return Scan::Incomplete(Resume::Restart),
            Some(b) if b.is_ascii_digit() => i = digits_from(i),
            Some(_) => return Scan::Invalid(LexicalError::MissingIntegerAfterDecimal, i),
        }
    }

    if matches!(input.get(i), Some(b'e' | b'E')) {
        lexeme = Lexeme::Double;
        i += 1;
        if matches!(input.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        match input.get(i) {
            None => return Scan::Incomplete(Resume::Restart),
            Some(b) if b.is_ascii_digit() => i = digits_from(i),
            Some(_) => return Scan::Invalid(LexicalError::MissingIntegerAfterExponent, i),
        }
    }

    // Without a following byte the number might still continue.
    if i == input.len() {
        return Scan::Incomplete(Resume::Restart);
    }
    Scan::Complete(lexeme, i)
}

fn scan_string(input: &[u8], mut at: usize, mut escaped: bool) -> Scan {
    loop {
        let Some(rel) = input[at..].find_byteset(STRING_SPECIAL) else {
            return Scan::Incomplete(Resume::String {
                at: input.len(),
                escaped,
            });
        };
        let i = at + rel;
        match input[i] {
            b'"' => {
                let lexeme = if escaped {
                    Lexeme::StringWithEscapes
                } else {
                    Lexeme::String
                };
                return Scan::Complete(lexeme, i + 1);
            }
            b'\\' => {
                escaped = true;
                match scan_escape(input, i) {
                    Escape::Valid(next) => at = next,
                    Escape::Partial => return Scan::Incomplete(Resume::String { at: i, escaped }),
                    Escape::Invalid(err, pos) => return Scan::Invalid(err, pos),
                }
            }
            control => return Scan::Invalid(LexicalError::ControlCharacter(control), i),
        }
    }
}

/// Validates the escape sequence whose backslash is at `input[i]`.
fn scan_escape(input: &[u8], i: usize) -> Escape {
    match input.get(i + 1) {
        None => Escape::Partial,
        Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => Escape::Valid(i + 2),
        Some(b'u') => {
            for j in i + 2..i + 6 {
                match input.get(j) {
                    None => return Escape::Partial,
                    Some(h) if h.is_ascii_hexdigit() => {}
                    Some(&h) => return Escape::Invalid(LexicalError::InvalidHexEscape(h), j),
                }
            }
            Escape::Valid(i + 6)
        }
        Some(&other) => Escape::Invalid(LexicalError::InvalidEscape(other), i + 1),
    }
}

fn scan_line_comment(input: &[u8], at: usize) -> Scan {
    match input[at..].find_byte(b'\n') {
        Some(rel) => Scan::Complete(Lexeme::Comment, at + rel + 1),
        None => Scan::Incomplete(Resume::LineComment { at: input.len() }),
    }
}

fn scan_block_comment(input: &[u8], at: usize) -> Scan {
    match input[at..].find(b"*/") {
        Some(rel) => Scan::Complete(Lexeme::Comment, at + rel + 2),
        // A trailing `*` may pair with a `/` in the next chunk.
        None => Scan::Incomplete(Resume::BlockComment {
            at: input.len().saturating_sub(1).max(at),
        }),
    }
}
