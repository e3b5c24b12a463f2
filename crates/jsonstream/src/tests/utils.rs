use core::fmt::Write;

use serde_json::Value;

use crate::{ParseEvent, ParserError, ParserOptions, Scalar, tokenize_bytes};

/// Parses `input` with the given options and collects every event, stopping at
/// the first error.
pub(crate) fn parse_with(input: &[u8], options: ParserOptions) -> Result<Vec<ParseEvent>, ParserError> {
    tokenize_bytes(input, options).collect()
}

pub(crate) fn parse(input: &str) -> Result<Vec<ParseEvent>, ParserError> {
    parse_with(input.as_bytes(), ParserOptions::default())
}

/// Same as [`parse_with`], reading `chunk_size` bytes at a time.
pub(crate) fn parse_chunked(
    input: &str,
    chunk_size: usize,
    options: ParserOptions,
) -> Result<Vec<ParseEvent>, ParserError> {
    parse_with(input.as_bytes(), options.with_chunk_size(chunk_size))
}

/// The events a correct parser emits for `value`.
pub(crate) fn expected_events(value: &Value) -> Vec<ParseEvent> {
    fn walk(value: &Value, out: &mut Vec<ParseEvent>) {
        match value {
            Value::Null => out.push(Scalar::Null.into()),
            Value::Bool(b) => out.push(Scalar::Bool(*b).into()),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) if !n.is_f64() => out.push(Scalar::Integer(i).into()),
                (_, Some(f)) => out.push(Scalar::Double(f).into()),
                _ => panic!("unrepresentable number {n}"),
            },
            Value::String(s) => out.push(Scalar::String(s.clone()).into()),
            Value::Array(items) => {
                out.push(ParseEvent::StartArray);
                for item in items {
                    walk(item, out);
                }
                out.push(ParseEvent::EndArray);
            }
            Value::Object(map) => {
                out.push(ParseEvent::StartMap);
                for (key, item) in map {
                    out.push(Scalar::String(key.clone()).into());
                    walk(item, out);
                }
                out.push(ParseEvent::EndMap);
            }
        }
    }

    let mut out = Vec::new();
    walk(value, &mut out);
    out
}

/// Renders an event sequence back into JSON text. Root values are separated
/// by newlines.
pub(crate) fn render_events(events: &[ParseEvent]) -> String {
    // (is_map, items written so far)
    let mut stack: Vec<(bool, usize)> = Vec::new();
    let mut out = String::new();
    for event in events {
        if !event.is_end() {
            match stack.last_mut() {
                Some((is_map, count)) => {
                    if *is_map && *count % 2 == 1 {
                        out.push(':');
                    } else if *count > 0 {
                        out.push(',');
                    }
                    *count += 1;
                }
                None if !out.is_empty() => out.push('\n'),
                None => {}
            }
        }
        match event {
            ParseEvent::StartMap => {
                out.push('{');
                stack.push((true, 0));
            }
            ParseEvent::StartArray => {
                out.push('[');
                stack.push((false, 0));
            }
            ParseEvent::EndMap => {
                stack.pop();
                out.push('}');
            }
            ParseEvent::EndArray => {
                stack.pop();
                out.push(']');
            }
            ParseEvent::Value(scalar) => write!(out, "{scalar}").unwrap(),
        }
    }
    out
}

#[test]
fn render_events_reproduces_structure() {
    let input = r#"{"a":[1,2.5,{"b":null}],"c":"x\ny"}"#;
    let events = parse(input).unwrap();
    assert_eq!(render_events(&events), input);
}

#[test]
fn expected_events_match_parser() {
    let value = serde_json::json!({"k": [1, -2.5, true, null, "s"], "e": {}});
    let text = serde_json::to_string(&value).unwrap();
    assert_eq!(parse(&text).unwrap(), expected_events(&value));
}
