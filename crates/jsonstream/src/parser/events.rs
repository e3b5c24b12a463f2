//! Event builder: tokens in, structural events out.
//!
//! An explicit stack of [`Frame`]s replaces recursion, one frame per open
//! container, so nesting depth is bounded by memory rather than by the call
//! stack. Each call to [`Iterator::next`] pulls as many tokens as it takes to
//! produce exactly one event.
use core::iter::FusedIterator;
use std::io::BufRead;

use super::{
    error::{GrammarError, ParserError, SyntaxError},
    options::ParserOptions,
    tokens::{Token, TokenKind, TokenStream},
};
use crate::event::ParseEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Inside `[...]`; `first` until the first element has been opened.
    Array { first: bool },
    Map(MapState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapState {
    /// Expecting a key or the closing brace.
    Key { first: bool },
    /// A key has been emitted; expecting the colon and the value.
    Colon,
}

/// Lazy sequence of [`ParseEvent`]s over a buffered byte source.
///
/// Created by [`tokenize`](crate::tokenize) and its siblings. The iterator is
/// fused: after it yields an error or reaches the end of the input it only
/// yields `None`.
#[derive(Debug)]
pub struct Events<R> {
    tokens: TokenStream<R>,
    stack: Vec<Frame>,
    allow_multiple_json_values: bool,
    started: bool,
    finished: bool,
}

impl<R: BufRead> Events<R> {
    /// Creates the event sequence over `reader`. Nothing is read until the
    /// first call to `next`.
    #[must_use]
    pub fn new(reader: R, options: ParserOptions) -> Self {
        Self {
            tokens: TokenStream::new(reader, &options),
            stack: Vec::new(),
            allow_multiple_json_values: options.allow_multiple_json_values,
            started: false,
            finished: false,
        }
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Absolute byte offset the scanner has reached.
    #[must_use]
    pub fn position(&self) -> usize {
        self.tokens.position()
    }

    fn step(&mut self) -> Result<Option<ParseEvent>, ParserError> {
        let Some(&frame) = self.stack.last() else {
            return self.step_root();
        };

        let Some(token) = self.tokens.next_token()? else {
            return Err(self.end_of_input());
        };
        match frame {
            Frame::Array { first } => {
                if token.kind() == TokenKind::RightBracket {
                    self.stack.pop();
                    return Ok(Some(ParseEvent::EndArray));
                }
                set_top(&mut self.stack, Frame::Array { first: false });
                if first {
                    return open(&mut self.stack, &token).map(Some);
                }
                expect(&token, TokenKind::Comma, GrammarError::MissingComma)?;

                let Some(value) = self.tokens.next_token()? else {
                    return Err(self.end_of_input());
                };
                open(&mut self.stack, &value).map(Some)
            }
            Frame::Map(MapState::Key { first }) => {
                if token.kind() == TokenKind::RightBrace {
                    self.stack.pop();
                    return Ok(Some(ParseEvent::EndMap));
                }
                set_top(&mut self.stack, Frame::Map(MapState::Colon));
                if first {
                    return key(&token).map(Some);
                }
                expect(&token, TokenKind::Comma, GrammarError::MissingComma)?;

                let Some(key_token) = self.tokens.next_token()? else {
                    return Err(self.end_of_input());
                };
                key(&key_token).map(Some)
            }
            Frame::Map(MapState::Colon) => {
                expect(&token, TokenKind::Colon, GrammarError::MissingColon)?;
                set_top(&mut self.stack, Frame::Map(MapState::Key { first: false }));

                let Some(value) = self.tokens.next_token()? else {
                    return Err(self.end_of_input());
                };
                open(&mut self.stack, &value).map(Some)
            }
        }
    }

    /// Handles a pull with no open container: the first root value, the end
    /// of input, or whatever follows a completed root value.
    fn step_root(&mut self) -> Result<Option<ParseEvent>, ParserError> {
        let Some(token) = self.tokens.next_token()? else {
            return Ok(None);
        };
        if self.started && !self.allow_multiple_json_values {
            return Err(ParserError::new(
                GrammarError::TrailingContent,
                token.offset(),
            ));
        }
        self.started = true;
        open(&mut self.stack, &token).map(Some)
    }

    fn end_of_input(&self) -> ParserError {
        ParserError::new(SyntaxError::UnexpectedEndOfInput, self.tokens.position())
    }
}

/// Emits the event for a token in value position, pushing a frame for
/// container openers.
fn open(stack: &mut Vec<Frame>, token: &Token<'_>) -> Result<ParseEvent, ParserError> {
    match token.kind() {
        TokenKind::LeftBrace => {
            stack.push(Frame::Map(MapState::Key { first: true }));
            Ok(ParseEvent::StartMap)
        }
        TokenKind::LeftBracket => {
            stack.push(Frame::Array { first: true });
            Ok(ParseEvent::StartArray)
        }
        _ => token.to_scalar().map(ParseEvent::Value),
    }
}

/// Emits the event for a token in key position. Any scalar is accepted.
fn key(token: &Token<'_>) -> Result<ParseEvent, ParserError> {
    match token.kind() {
        TokenKind::LeftBrace | TokenKind::LeftBracket => Err(ParserError::new(
            GrammarError::NonScalarKey,
            token.offset(),
        )),
        _ => token.to_scalar().map(ParseEvent::Value),
    }
}

fn expect(token: &Token<'_>, kind: TokenKind, err: GrammarError) -> Result<(), ParserError> {
    if token.kind() == kind {
        Ok(())
    } else {
        Err(ParserError::new(err, token.offset()))
    }
}

fn set_top(stack: &mut [Frame], frame: Frame) {
    if let Some(top) = stack.last_mut() {
        *top = frame;
    }
}

impl<R: BufRead> Iterator for Events<R> {
    type Item = Result<ParseEvent, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.step() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                tracing::debug!(offset = err.offset(), depth = self.stack.len(), %err, "json stream failed");
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Events<R> {}
