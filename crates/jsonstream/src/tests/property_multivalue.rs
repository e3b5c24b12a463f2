use quickcheck::{QuickCheck, TestResult};

use super::{
    arbitrary::{JsonDoc, Layout},
    utils::{expected_events, parse_chunked},
};
use crate::{ParseEvent, ParserOptions, Scalar};

fn multi() -> ParserOptions {
    ParserOptions {
        allow_multiple_json_values: true,
        ..ParserOptions::default()
    }
}

#[test]
fn string_roots_back_to_back() {
    let events = parse_chunked("\"x\"\"y\"", 1, multi()).unwrap();
    assert_eq!(
        events,
        [
            ParseEvent::Value(Scalar::String("x".into())),
            ParseEvent::Value(Scalar::String("y".into())),
        ]
    );
}

#[test]
fn json_lines() {
    let src = "{\"id\":1}\n{\"id\":2}\n\n[]\n";
    let events = parse_chunked(src, 4, multi()).unwrap();
    assert_eq!(
        events,
        [
            ParseEvent::StartMap,
            ParseEvent::Value(Scalar::String("id".into())),
            ParseEvent::Value(Scalar::Integer(1)),
            ParseEvent::EndMap,
            ParseEvent::StartMap,
            ParseEvent::Value(Scalar::String("id".into())),
            ParseEvent::Value(Scalar::Integer(2)),
            ParseEvent::EndMap,
            ParseEvent::StartArray,
            ParseEvent::EndArray,
        ]
    );
}

/// Property: a stream of several whitespace-separated roots yields the
/// concatenation of each root's events, regardless of chunking.
#[test]
fn multi_value_roundtrip_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(docs: Vec<JsonDoc>, layout: Layout, chunk_size: usize) -> TestResult {
        if docs.is_empty() {
            return TestResult::discard();
        }

        let payload = docs
            .iter()
            .map(|doc| doc.render(layout))
            .collect::<Vec<_>>()
            .join("\n");
        let expected: Vec<ParseEvent> = docs.iter().flat_map(|doc| expected_events(&doc.0)).collect();

        match parse_chunked(&payload, 1 + chunk_size % 32, multi()) {
            Ok(events) => TestResult::from_bool(events == expected),
            Err(err) => TestResult::error(format!("{payload:?}: {err}")),
        }
    }

    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new()
        .tests(tests)
        .quickcheck(prop as fn(Vec<JsonDoc>, Layout, usize) -> TestResult);
}
