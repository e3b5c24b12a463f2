//! Pull-based JSON parser.
//!
//! Overview
//! - The pipeline has four stages, each pulled by the next: the chunk reader
//!   reads bounded, line-aware chunks from the source; the scanner splits a
//!   chunk into lexical tokens; the token stream decodes them and attaches
//!   offsets; the event builder checks the container grammar and emits
//!   [`ParseEvent`]s.
//! - Nothing is read ahead. The source is read only when the scanner has
//!   consumed the current chunk, and the scanner runs only when an event is
//!   requested.
//!
//! Memory
//! - At most one chunk, one carried token and one decoded string are held at a
//!   time, plus one stack frame per open container.
//! - Tokens borrow the chunk, the scanner's carry or the decode buffer.
//!   Events own their data.
//!
//! Errors
//! - Every error is fatal and carries the absolute byte offset where it was
//!   detected. See [`ParserError`].
use std::io::{BufRead, BufReader, Read};

mod chunks;
mod decode;
pub(crate) mod error;
mod escape_buffer;
mod events;
mod options;
mod scanner;
mod tokens;

pub use error::{
    EncodingError, ErrorSource, GrammarError, LexicalError, NumericError, ParserError, SyntaxError,
};
pub use events::Events;
pub use options::{DEFAULT_CHUNK_SIZE, ParserOptions};
pub use tokens::{Token, TokenKind, TokenStream};

#[cfg(doc)]
use crate::ParseEvent;

/// Parses JSON text read from `reader` into a lazy sequence of events.
///
/// The reader is wrapped in a [`BufReader`] whose capacity is the configured
/// chunk size, capped at [`DEFAULT_CHUNK_SIZE`]. Larger chunks are assembled
/// from several buffer fills.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
///
/// use jsonstream::{ParseEvent, ParserOptions, Scalar, tokenize};
///
/// let source = Cursor::new(b"[1, 2.5, true, null, \"x\"]".to_vec());
/// let events: Vec<_> = tokenize(source, ParserOptions::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     events,
///     vec![
///         ParseEvent::StartArray,
///         ParseEvent::Value(Scalar::Integer(1)),
///         ParseEvent::Value(Scalar::Double(2.5)),
///         ParseEvent::Value(Scalar::Bool(true)),
///         ParseEvent::Value(Scalar::Null),
///         ParseEvent::Value(Scalar::String("x".into())),
///         ParseEvent::EndArray,
///     ]
/// );
/// ```
pub fn tokenize<R: Read>(reader: R, options: ParserOptions) -> Events<BufReader<R>> {
    let capacity = options.effective_chunk_size().min(DEFAULT_CHUNK_SIZE);
    let reader = BufReader::with_capacity(capacity, reader);
    Events::new(reader, options)
}

/// Like [`tokenize`] for sources that already buffer.
pub fn tokenize_buf<R: BufRead>(reader: R, options: ParserOptions) -> Events<R> {
    Events::new(reader, options)
}

/// Parses an in-memory byte slice.
///
/// String content that is not valid UTF-8 is reported as an
/// [`EncodingError::InvalidUtf8`].
pub fn tokenize_bytes(bytes: &[u8], options: ParserOptions) -> Events<&[u8]> {
    Events::new(bytes, options)
}

/// Parses an in-memory string.
pub fn tokenize_str(text: &str, options: ParserOptions) -> Events<&[u8]> {
    tokenize_bytes(text.as_bytes(), options)
}
