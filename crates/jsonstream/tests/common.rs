#![allow(missing_docs, dead_code)]

use std::io::{self, Read};

pub const DOCUMENT: &str = r#"
{
    "moderation": {
        "decision": "allow",
        "reason": null
    },
    "snippets": [
        "fn main() {}",
        "println!(\"hi\")"
    ],
    "matrix": [
        [
            "a"
        ],
        []
    ],
    "score": 0.75,
    "count": 3,
    "ok": true
}"#;

// Simulates a network response that arrives in uneven pieces. Pieces are cut
// inside tokens and on container seams.
#[rustfmt::skip]
pub const STREAM: [&str; 10] = [
    r#"{"moderation":{"decision":"al"#,                 // inside a string
    r#"lo"#,                                            // string continues
    r#"w","reason":nu"#,                                // inside a literal
    r#"ll},""#,                                         // object end -> new key
    r#"snippets":["fn main() {}","#,
    r#""println!(\"hi\")"]"#,                           // escaped quotes
    r#","matrix":[["a"],[]],"score":0."#,               // inside a number
    r#"75,"count":3"#,                                  // number ends at the seam
    r#","ok":tr"#,
    r#"ue}"#,
];

/// A reader that hands out one piece per `read` call, never more than the
/// caller's buffer holds.
pub struct PieceReader<'a> {
    pieces: &'a [&'a str],
    current: &'a [u8],
}

impl<'a> PieceReader<'a> {
    pub fn new(pieces: &'a [&'a str]) -> Self {
        Self {
            pieces,
            current: &[],
        }
    }
}

impl Read for PieceReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.current.is_empty() {
            let Some((first, rest)) = self.pieces.split_first() else {
                return Ok(0);
            };
            self.current = first.as_bytes();
            self.pieces = rest;
        }
        let n = self.current.len().min(buf.len());
        buf[..n].copy_from_slice(&self.current[..n]);
        self.current = &self.current[n..];
        Ok(n)
    }
}

#[test]
fn stream_matches_document() {
    let streamed = STREAM.join("");

    let value: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
    let compact = serde_json::to_string(&value).unwrap();

    assert_eq!(streamed, compact);
}
