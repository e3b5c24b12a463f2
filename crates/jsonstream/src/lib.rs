//! Incremental, pull-based JSON event parser.
//!
//! Overview
//! - Reads JSON text from any [`std::io::Read`] in bounded, line-aware chunks
//!   and yields [`ParseEvent`]s one at a time: container starts and ends, and
//!   typed scalar values. Object keys arrive as ordinary `Value` events.
//! - Memory use is bounded by the chunk size, the longest single token and
//!   the nesting depth, never by the document size. Nesting is tracked on an
//!   explicit stack, so deep documents cannot overflow the call stack.
//! - Input is consumed lazily: the source is read only when the consumer asks
//!   for an event the current chunk cannot produce.
//!
//! Layers
//! - [`tokenize`] and friends return [`Events`], the structural layer.
//! - [`TokenStream`] exposes the raw token layer for consumers that want to
//!   do their own grammar.
//!
//! ```
//! use jsonstream::{ParseEvent, ParserOptions, Scalar, tokenize_str};
//!
//! let mut events = tokenize_str(r#"{"a": [1, 2], "b": {}}"#, ParserOptions::default());
//! assert_eq!(events.next().unwrap().unwrap(), ParseEvent::StartMap);
//! assert_eq!(
//!     events.next().unwrap().unwrap(),
//!     ParseEvent::Value(Scalar::String("a".into()))
//! );
//! assert_eq!(events.count(), 8);
//! ```

mod event;
mod parser;

#[cfg(test)]
mod tests;

pub use event::{ParseEvent, Scalar};
pub use parser::{
    DEFAULT_CHUNK_SIZE, EncodingError, ErrorSource, Events, GrammarError, LexicalError,
    NumericError, ParserError, ParserOptions, SyntaxError, Token, TokenKind, TokenStream, tokenize,
    tokenize_buf, tokenize_bytes, tokenize_str,
};
