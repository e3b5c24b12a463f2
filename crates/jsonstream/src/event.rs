//! Events emitted by the streaming JSON parser.
//!
//! A [`ParseEvent`] describes one step of document shape in document order:
//! a container opening or closing, or a single scalar. Object keys are not
//! distinguished from other scalars; a map is a `StartMap`, then alternating
//! key and value sub-sequences, then `EndMap`.
//!
//! # Examples
//!
//! ```
//! use jsonstream::{ParseEvent, ParserOptions, Scalar, tokenize_str};
//!
//! let events: Vec<_> = tokenize_str(r#"{"a": [1, true]}"#, ParserOptions::default())
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         ParseEvent::StartMap,
//!         ParseEvent::Value(Scalar::String("a".to_string())),
//!         ParseEvent::StartArray,
//!         ParseEvent::Value(Scalar::Integer(1)),
//!         ParseEvent::Value(Scalar::Bool(true)),
//!         ParseEvent::EndArray,
//!         ParseEvent::EndMap,
//!     ]
//! );
//! ```
use core::fmt::{self, Write};

/// A leaf JSON value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A number without fraction or exponent that fits an `i64`.
    Integer(i64),
    /// A number with a fraction or an exponent, or an integer too wide for
    /// `i64`. Out-of-range magnitudes are infinite.
    Double(f64),
    /// A string with its escapes resolved.
    String(String),
}

/// One structural step of a JSON document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum ParseEvent {
    /// `{`
    StartMap,
    /// `}`
    EndMap,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// A scalar, either a value or an object key.
    Value(Scalar),
}

impl ParseEvent {
    /// Returns `true` for `StartMap` and `StartArray`.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, ParseEvent::StartMap | ParseEvent::StartArray)
    }

    /// Returns `true` for `EndMap` and `EndArray`.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, ParseEvent::EndMap | ParseEvent::EndArray)
    }

    /// The scalar carried by a `Value` event.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ParseEvent::Value(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl From<Scalar> for ParseEvent {
    fn from(scalar: Scalar) -> Self {
        ParseEvent::Value(scalar)
    }
}

/// Writes `src` as the body of a JSON string literal, without the quotes.
pub(crate) fn write_escaped_string<W: Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            // Pre-2019 JSON parsers choke on raw line separators.
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_ascii_control() || c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Renders the scalar as JSON text.
///
/// Doubles always carry a fraction or exponent so that they scan back as
/// doubles; non-finite doubles have no JSON form and render as `null`.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Double(n) if n.is_finite() => write!(f, "{n:?}"),
            Scalar::Double(_) => f.write_str("null"),
            Scalar::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
        }
    }
}
